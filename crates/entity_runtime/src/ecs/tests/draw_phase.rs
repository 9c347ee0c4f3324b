//! Structural mutation is refused while drawing

use super::{EventLog, Health, Scripted};
use crate::ecs::{EcsError, Entity, ErrorKind, TemplateArgs, World};
use crate::foundation::math::Vec2;
use crate::scene::NodeId;
use std::cell::RefCell;
use std::rc::Rc;

fn tree_shape(world: &World) -> Vec<(Entity, NodeId)> {
    world
        .tree()
        .iter()
        .filter_map(|entity| world.tree().find_parent(entity).map(|parent| (entity, parent)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_operations_fail_during_draw() -> Result<(), EcsError> {
        let log = EventLog::new();
        let errors: Rc<RefCell<Vec<EcsError>>> = Rc::default();
        let mut world = World::default();

        let target = world.create_entity()?;
        world.add_component(target, Health(1))?;
        let sibling = world.create_entity()?;
        let drawer = world.create_entity()?;

        let sink = Rc::clone(&errors);
        world.add_component(
            drawer,
            Scripted::new("drawer", &log, move |hook, ctx| {
                if hook != "draw" {
                    return Ok(());
                }
                let attempts = [
                    ctx.create_entity().map(|_| ()),
                    ctx.create_entity_from_template_named("anything", &TemplateArgs::new()).map(|_| ()),
                    ctx.destroy_entity(target),
                    ctx.add_component(sibling, Health(2)).map(|_| ()),
                    ctx.remove_component::<Health>(target),
                    ctx.set_parent(target, Some(sibling)),
                    ctx.set_z_index(target, 9),
                    ctx.reset_transform(target),
                ];
                sink.borrow_mut().extend(attempts.into_iter().filter_map(Result::err));

                // Non-structural edits stay allowed
                ctx.set_position(target, Vec2::new(3.0, 4.0))
            }),
        )?;
        world.update(0.0)?;

        let shape_before = tree_shape(&world);
        let entities_before = world.entity_count();
        world.draw(0.0)?;

        let errors = errors.borrow();
        assert_eq!(errors.len(), 8);
        assert!(errors.iter().all(|err| matches!(err, EcsError::DrawPhaseViolation { .. })));
        assert!(errors.iter().all(|err| err.kind() == ErrorKind::WorkflowViolation));

        assert_eq!(tree_shape(&world), shape_before);
        assert_eq!(world.entity_count(), entities_before);
        assert_eq!(world.get_component::<Health>(target), Some(&Health(1)));
        assert_eq!(world.transform(target).map(|t| t.z_index()), Some(0));
        assert_eq!(world.transform(target).map(|t| t.position()), Some(Vec2::new(3.0, 4.0)));
        Ok(())
    }

    #[test]
    fn test_structural_operations_allowed_again_after_draw() -> Result<(), EcsError> {
        let mut world = World::default();
        let entity = world.create_entity()?;
        world.update(0.0)?;
        world.draw(0.0)?;

        world.set_z_index(entity, 2)?;
        world.destroy_entity(entity)?;
        world.update(0.0)?;
        assert!(world.tree().is_empty());
        Ok(())
    }
}
