//! Part library propagation.
//!
//! When a part in [`PartStore`] is re-sliced its library is rebuilt into a new
//! instance; actors still hold the previous one. [`refresh_part_libraries`]
//! re-binds every layer to the newest library of the part it shows, or clears
//! it if the part is gone. All actors are checked when the store changed;
//! otherwise only actors that equipped a part since the last check, since the
//! part they were handed may predate a rebuild.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::actoranimation::ActorAnimation;
use crate::resources::partstore::PartStore;

pub fn refresh_part_libraries(
    maybe_store: Option<Res<PartStore>>,
    mut query: Query<(Entity, &mut ActorAnimation)>,
) {
    let Some(store) = maybe_store else {
        return;
    };
    let store_changed = store.is_changed();
    for (entity, mut actor) in query.iter_mut() {
        if !store_changed && !actor.needs_rebind() {
            continue;
        }
        // bypass so untouched actors don't show up as changed
        let changed = actor.bypass_change_detection().rebind_from_store(&store);
        if changed > 0 {
            actor.set_changed();
            debug!("refresh_part_libraries: {:?} re-bound {} layer(s)", entity, changed);
        }
    }
}
