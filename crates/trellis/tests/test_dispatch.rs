//! Integration tests for hit testing, capture, focus and popups.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use trellis::{
        Core, Gui, HostEvent, NodeId, Options,
        error::Result,
        event::{
            Event, KeyCode, KeyEvent, MouseAction, MouseButton, MouseEvent,
            key::{Alt, Ctrl, Shift},
        },
        geom::{Point, Rect, Size},
        options::Color,
        testing::{backend::RecordingBackend, probe::Probe},
        widgets::{ContextMenu, MenuItem},
    };

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn core() -> Result<Core> {
        Core::new(Size::new(300, 300), Options::default())
    }

    fn probe_at(core: &mut Core, parent: NodeId, probe: Probe, rect: Rect) -> Result<NodeId> {
        core.build(probe)?.outer(rect).attach(parent)
    }

    fn keys_seen(core: &Core, id: NodeId) -> Result<usize> {
        let probe = core.widget::<Probe>(id)?;
        Ok(probe
            .events
            .iter()
            .filter(|e| matches!(e, Event::Key(_)))
            .count())
    }

    #[test]
    fn overlay_is_hit_first_and_painted_last() -> Result<()> {
        let mut core = core()?;
        let root = core.root();
        let a = probe_at(
            &mut core,
            root,
            Probe::new().handling().painted(RED),
            Rect::new(0, 0, 200, 200),
        )?;
        let b = probe_at(
            &mut core,
            root,
            Probe::new().handling().painted(BLUE).as_overlay(),
            Rect::new(50, 50, 50, 50),
        )?;
        assert_eq!(core.children(root)?, &[b, a]);

        assert!(core.mouse(MouseEvent::down(MouseButton::Left, (60, 60)))?);
        let hits = core.widget::<Probe>(b)?.mouse_of(MouseAction::Down);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].location, Point::new(10, 10));
        assert!(core.widget::<Probe>(a)?.mouse_of(MouseAction::Down).is_empty());

        let mut backend = RecordingBackend::new();
        core.render(&mut backend, Duration::ZERO)?;
        let red = backend.first_fill_of(RED);
        let blue = backend.first_fill_of(BLUE);
        assert!(red.is_some() && blue.is_some());
        assert!(red < blue);
        Ok(())
    }

    #[test]
    fn clicking_a_normal_child_keeps_overlays_in_front() -> Result<()> {
        let mut core = core()?;
        let root = core.root();
        let a = probe_at(&mut core, root, Probe::new(), Rect::new(0, 0, 100, 100))?;
        let b = probe_at(&mut core, root, Probe::new(), Rect::new(100, 0, 100, 100))?;
        let o = probe_at(
            &mut core,
            root,
            Probe::new().as_overlay(),
            Rect::new(250, 250, 10, 10),
        )?;
        core.mouse(MouseEvent::down(MouseButton::Left, (150, 50)))?;
        assert_eq!(core.children(root)?, &[o, a, b]);
        core.validate()
    }

    #[test]
    fn hover_transitions_fire_once() -> Result<()> {
        let mut core = core()?;
        let root = core.root();
        let a = probe_at(&mut core, root, Probe::new(), Rect::new(0, 0, 50, 50))?;
        let b = probe_at(&mut core, root, Probe::new(), Rect::new(100, 0, 50, 50))?;
        core.mouse(MouseEvent::moved((10, 10)))?;
        core.mouse(MouseEvent::moved((20, 20)))?;
        core.mouse(MouseEvent::moved((110, 10)))?;
        core.mouse(MouseEvent::moved((120, 10)))?;

        let pa = core.widget::<Probe>(a)?;
        assert_eq!(pa.count(&Event::MouseEnter), 1);
        assert_eq!(pa.count(&Event::MouseLeave), 1);
        assert_eq!(pa.mouse_of(MouseAction::Move).len(), 2);
        let pb = core.widget::<Probe>(b)?;
        assert_eq!(pb.count(&Event::MouseEnter), 1);
        assert_eq!(pb.count(&Event::MouseLeave), 0);
        assert_eq!(core.node(root)?.hover_child(), Some(b));

        core.mouse(MouseEvent::moved((250, 250)))?;
        assert_eq!(core.widget::<Probe>(b)?.count(&Event::MouseLeave), 1);
        assert_eq!(core.node(root)?.hover_child(), None);
        Ok(())
    }

    #[test]
    fn capture_routes_outside_bounds() -> Result<()> {
        let mut core = core()?;
        let root = core.root();
        let a = probe_at(&mut core, root, Probe::new().capturing(), Rect::new(0, 0, 50, 50))?;
        let b = probe_at(&mut core, root, Probe::new(), Rect::new(200, 200, 50, 50))?;

        core.mouse(MouseEvent::down(MouseButton::Left, (10, 10)))?;
        assert!(core.node(a)?.dragged());
        core.mouse(MouseEvent::moved((220, 220)))?;
        core.mouse(MouseEvent::up(MouseButton::Left, (220, 220)))?;
        assert!(!core.node(a)?.dragged());

        let moves = core.widget::<Probe>(a)?.mouse_of(MouseAction::Move);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].location, Point::new(220, 220));
        assert!(core.widget::<Probe>(b)?.events.is_empty());

        // Released: hit testing resumes.
        core.mouse(MouseEvent::moved((210, 210)))?;
        assert_eq!(core.widget::<Probe>(b)?.mouse_of(MouseAction::Move).len(), 1);
        Ok(())
    }

    #[test]
    fn capture_inside_a_nested_child() -> Result<()> {
        let mut core = core()?;
        let root = core.root();
        let outer = probe_at(&mut core, root, Probe::new(), Rect::new(100, 100, 100, 100))?;
        let inner = probe_at(&mut core, outer, Probe::new().capturing(), Rect::new(10, 10, 20, 20))?;
        core.mouse(MouseEvent::down(MouseButton::Left, (115, 115)))?;
        core.mouse(MouseEvent::moved((0, 0)))?;
        let moves = core.widget::<Probe>(inner)?.mouse_of(MouseAction::Move);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].location, Point::new(-110, -110));
        assert!(core.widget::<Probe>(outer)?.mouse_of(MouseAction::Move).is_empty());
        Ok(())
    }

    #[test]
    fn wheel_bubbles_until_claimed() -> Result<()> {
        let mut core = core()?;
        let root = core.root();
        let parent = probe_at(&mut core, root, Probe::new().handling(), Rect::new(0, 0, 100, 100))?;
        let quiet = probe_at(&mut core, parent, Probe::new(), Rect::new(0, 0, 50, 50))?;
        let busy = probe_at(&mut core, parent, Probe::new().handling(), Rect::new(50, 50, 50, 50))?;

        assert!(core.mouse(MouseEvent::wheel((10, 10), 1))?);
        assert_eq!(core.widget::<Probe>(quiet)?.mouse_of(MouseAction::Wheel).len(), 1);
        assert_eq!(core.widget::<Probe>(parent)?.mouse_of(MouseAction::Wheel).len(), 1);

        assert!(core.mouse(MouseEvent::wheel((60, 60), -1))?);
        assert_eq!(core.widget::<Probe>(busy)?.mouse_of(MouseAction::Wheel).len(), 1);
        assert_eq!(core.widget::<Probe>(parent)?.mouse_of(MouseAction::Wheel).len(), 1);

        assert!(!core.mouse(MouseEvent::wheel((250, 250), 1))?);
        Ok(())
    }

    #[test]
    fn down_moves_the_focus_chain() -> Result<()> {
        let mut core = core()?;
        let root = core.root();
        let p1 = probe_at(&mut core, root, Probe::new(), Rect::new(0, 0, 100, 100))?;
        let c1 = probe_at(&mut core, p1, Probe::new(), Rect::new(0, 0, 10, 10))?;
        let p2 = probe_at(&mut core, root, Probe::new(), Rect::new(100, 0, 100, 100))?;
        let c2 = probe_at(&mut core, p2, Probe::new(), Rect::new(0, 0, 10, 10))?;

        core.mouse(MouseEvent::down(MouseButton::Left, (5, 5)))?;
        assert!(core.node(p1)?.has_focus() && core.node(c1)?.has_focus());
        assert_eq!(core.node(root)?.focused_child(), Some(p1));

        core.mouse(MouseEvent::down(MouseButton::Left, (105, 5)))?;
        assert!(core.node(p2)?.has_focus() && core.node(c2)?.has_focus());
        assert!(!core.node(p1)?.has_focus() && !core.node(c1)?.has_focus());
        assert_eq!(core.widget::<Probe>(p1)?.count(&Event::FocusLost), 1);
        assert_eq!(core.widget::<Probe>(c1)?.count(&Event::FocusLost), 1);
        assert_eq!(core.widget::<Probe>(c2)?.count(&Event::Focus), 1);
        Ok(())
    }

    #[test]
    fn keys_follow_the_focus_chain() -> Result<()> {
        let mut core = core()?;
        let root = core.root();
        let parent = probe_at(&mut core, root, Probe::new().handling_keys(), Rect::new(0, 0, 100, 100))?;
        let eager = probe_at(&mut core, parent, Probe::new().handling_keys(), Rect::new(0, 0, 10, 10))?;
        let shy = probe_at(&mut core, parent, Probe::new(), Rect::new(20, 0, 10, 10))?;
        let other = probe_at(&mut core, root, Probe::new().handling_keys(), Rect::new(100, 0, 10, 10))?;

        core.focus(eager)?;
        assert!(core.key(KeyEvent::down('a'))?);
        assert_eq!(keys_seen(&core, eager)?, 1);
        assert_eq!(keys_seen(&core, parent)?, 0);

        core.focus(shy)?;
        assert!(!core.node(eager)?.has_focus());
        assert!(core.key(KeyEvent::down('b'))?);
        assert_eq!(keys_seen(&core, shy)?, 1);
        assert_eq!(keys_seen(&core, parent)?, 1);
        assert_eq!(keys_seen(&core, other)?, 0);

        assert!(core.char('z')?);
        assert_eq!(core.widget::<Probe>(parent)?.count(&Event::Char('z')), 1);
        Ok(())
    }

    #[test]
    fn modified_keys_reach_the_focused_node_intact() -> Result<()> {
        let mut core = core()?;
        let root = core.root();
        let target = probe_at(&mut core, root, Probe::new().handling_keys(), Rect::new(0, 0, 10, 10))?;
        core.focus(target)?;
        for key in [Ctrl + Shift + 'k', Alt + KeyCode::F(4), Shift + KeyCode::Tab] {
            assert!(core.key(KeyEvent::down(key))?);
            let last = core.widget::<Probe>(target)?.events.last();
            assert_eq!(last, Some(&Event::Key(KeyEvent::down(key))));
        }
        assert_ne!(Ctrl + 'k', KeyCode::Char('k'));
        Ok(())
    }

    #[test]
    fn focusing_a_detached_node_fails() -> Result<()> {
        let mut core = core()?;
        let loose = core.create(Probe::new())?;
        assert!(core.focus(loose).is_err());
        assert!(!core.node(loose)?.has_focus());
        Ok(())
    }

    #[test]
    fn only_one_popup_is_live() -> Result<()> {
        let mut gui = Gui::new(Size::new(300, 300), Options::default())?;
        let root = gui.root();
        let core = gui.core_mut();
        let first = core.create(ContextMenu::new())?;
        core.add_new(first, MenuItem::new("One"))?;
        let second = core.create(ContextMenu::new())?;
        core.add_new(second, MenuItem::new("Two"))?;

        gui.open_popup(first, Point::new(10, 10))?;
        assert_eq!(gui.core().parent(first), Some(root));
        gui.open_popup(second, Point::new(20, 20))?;
        assert_eq!(gui.core().parent(first), None);
        assert_eq!(gui.core().popup(), Some(second));
        assert_eq!(gui.core().children(root)?[0], second);

        assert!(gui.close_popup()?);
        assert!(!gui.close_popup()?);
        assert_eq!(gui.core().parent(second), None);
        gui.core().validate()
    }

    #[test]
    fn host_right_click_opens_context_menu() -> Result<()> {
        let mut gui = Gui::new(Size::new(300, 300), Options::default())?;
        let root = gui.root();
        let core = gui.core_mut();
        let target = probe_at(core, root, Probe::new(), Rect::new(100, 100, 100, 100))?;
        let plain = probe_at(core, root, Probe::new(), Rect::new(0, 0, 50, 50))?;
        let menu = core.create(ContextMenu::new())?;
        core.add_new(menu, MenuItem::new("Rename"))?;
        core.set_context_menu(target, Some(menu))?;

        gui.event(HostEvent::MouseDown(MouseButton::Right, Point::new(10, 10)))?;
        assert_eq!(gui.core().popup(), None);

        assert!(gui.event(HostEvent::MouseDown(MouseButton::Right, Point::new(150, 160)))?);
        assert_eq!(gui.core().popup(), Some(menu));
        assert_eq!(gui.core().node(menu)?.outer().tl, Point::new(150, 160));

        // A press elsewhere closes the menu, then reaches its target.
        gui.event(HostEvent::MouseDown(MouseButton::Left, Point::new(20, 20)))?;
        assert_eq!(gui.core().popup(), None);
        assert_eq!(gui.core().widget::<Probe>(plain)?.mouse_of(MouseAction::Down).len(), 2);
        Ok(())
    }
}
