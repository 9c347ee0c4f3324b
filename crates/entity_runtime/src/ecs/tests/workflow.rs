//! Frame protocol: ordering, id recycling, re-entrance, teardown

use super::{EventLog, Probe, Scripted};
use crate::ecs::{EcsError, FramePhase, World};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_one_and_reuse_smallest_freed() -> Result<(), EcsError> {
        let mut world = World::default();
        let a = world.create_entity()?;
        let b = world.create_entity()?;
        let c = world.create_entity()?;
        assert_eq!((a.id(), b.id(), c.id()), (1, 2, 3));
        world.update(0.0)?;

        world.destroy_entity(b)?;
        world.destroy_entity(a)?;
        // Ids are only recycled once the removal drain has run
        assert_eq!(world.create_entity()?.id(), 4);
        world.update(0.0)?;

        assert_eq!(world.create_entity()?.id(), 1);
        assert_eq!(world.create_entity()?.id(), 2);
        assert_eq!(world.create_entity()?.id(), 5);
        Ok(())
    }

    #[test]
    fn test_update_is_pre_order_and_draw_is_post_order() -> Result<(), EcsError> {
        let log = EventLog::new();
        let mut world = World::default();

        let parent = world.create_entity()?;
        world.add_component(parent, Probe::new("p", &log))?;
        let back = world.create_entity()?;
        world.set_parent(back, Some(parent))?;
        world.set_z_index(back, 1)?;
        world.add_component(back, Probe::new("back", &log))?;
        let front = world.create_entity()?;
        world.set_parent(front, Some(parent))?;
        world.add_component(front, Probe::new("front", &log))?;

        world.update(0.016)?;
        assert_eq!(world.children(parent), &[front, back]);
        assert_eq!(log.of_hook("start"), vec!["p:start", "back:start", "front:start"]);
        assert_eq!(log.of_hook("update"), vec!["p:update", "front:update", "back:update"]);

        log.take();
        world.draw(0.016)?;
        assert_eq!(
            log.events(),
            vec![
                "front:before_draw",
                "front:draw",
                "front:after_draw",
                "back:before_draw",
                "back:draw",
                "back:after_draw",
                "p:before_draw",
                "p:draw",
                "p:after_draw",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_start_runs_enable_then_update_in_same_frame() -> Result<(), EcsError> {
        let log = EventLog::new();
        let mut world = World::default();
        let entity = world.create_entity()?;
        world.add_component(entity, Probe::new("e", &log))?;

        world.update(0.0)?;
        assert_eq!(log.take(), vec!["e:start", "e:enable", "e:update"]);

        world.update(0.0)?;
        assert_eq!(log.take(), vec!["e:update"]);
        Ok(())
    }

    #[test]
    fn test_failed_start_still_delivers_enable_next_update() -> Result<(), EcsError> {
        let log = EventLog::new();
        let mut world = World::default();
        let entity = world.create_entity()?;
        let mut failed = false;
        world.add_component(
            entity,
            Scripted::new("a", &log, move |hook, _ctx| {
                if hook == "start" && !failed {
                    failed = true;
                    return Err(EcsError::UnknownTemplate("turret".to_string()));
                }
                Ok(())
            }),
        )?;

        assert!(world.update(0.0).is_err());
        assert_eq!(world.phase(), FramePhase::Idle);
        assert_eq!(log.take(), vec!["a:start"]);

        world.update(0.0)?;
        world.update(0.0)?;
        assert_eq!(log.take(), vec!["a:enable", "a:update", "a:update"]);

        world.destroy_entity(entity)?;
        world.update(0.0)?;
        assert_eq!(log.take(), vec!["a:disable", "a:destroy"]);
        Ok(())
    }

    #[test]
    fn test_component_added_disabled_gets_disable_after_start() -> Result<(), EcsError> {
        let log = EventLog::new();
        let mut world = World::default();
        let entity = world.create_entity()?;
        world.add_component(entity, Probe::new("e", &log))?;
        world.set_component_enabled::<Probe>(entity, false)?;

        world.update(0.0)?;
        world.draw(0.0)?;
        assert_eq!(log.take(), vec!["e:start", "e:disable"]);
        Ok(())
    }

    #[test]
    fn test_frame_stats() -> Result<(), EcsError> {
        let log = EventLog::new();
        let mut world = World::default();
        for label in ["a", "b", "c"] {
            let entity = world.create_entity()?;
            world.add_component(entity, Probe::new(label, &log))?;
        }

        world.update(0.0)?;
        let stats = world.last_frame_stats();
        assert_eq!(stats.entities_inserted, 3);
        assert_eq!(stats.components_started, 3);
        assert_eq!(stats.update_calls, 3);

        world.draw(0.0)?;
        assert_eq!(world.last_frame_stats().draw_calls, 9);
        Ok(())
    }

    #[test]
    fn test_update_reentrance_is_refused() -> Result<(), EcsError> {
        let log = EventLog::new();
        let mut world = World::default();
        let entity = world.create_entity()?;
        world.add_component(
            entity,
            Scripted::new("s", &log, |hook, ctx| match hook {
                "update" => ctx.update(0.0),
                "draw" => ctx.draw(0.0),
                _ => Ok(()),
            }),
        )?;

        assert_eq!(world.update(0.0), Err(EcsError::FrameReentered { phase: FramePhase::Updating }));
        assert_eq!(world.phase(), FramePhase::Idle);

        assert_eq!(world.draw(0.0), Err(EcsError::FrameReentered { phase: FramePhase::Drawing }));
        assert_eq!(world.phase(), FramePhase::Idle);
        Ok(())
    }

    #[test]
    fn test_shutdown_destroys_everything_once() -> Result<(), EcsError> {
        let log = EventLog::new();
        let mut world = World::default();
        let root = world.create_entity()?;
        world.add_component(root, Probe::new("root", &log))?;
        let child = world.create_entity()?;
        world.set_parent(child, Some(root))?;
        world.add_component(child, Probe::new("child", &log))?;
        world.update(0.0)?;

        let pending = world.create_entity()?;
        world.add_component(pending, Probe::new("pending", &log))?;
        log.take();

        world.shutdown()?;
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.component_count(), 0);
        assert!(world.tree().is_empty());
        assert_eq!(
            log.events(),
            vec!["child:disable", "child:destroy", "root:disable", "root:destroy", "pending:destroy"]
        );
        Ok(())
    }
}
