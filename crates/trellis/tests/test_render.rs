//! Integration tests for the clipped render traversal.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use trellis::{
        Core, Gui, NodeId, Options,
        error::{Error, Result},
        geom::{Insets, Point, Rect, Size},
        options::{Color, GroupLayoutSkin},
        testing::{
            backend::{DrawCall, RecordingBackend},
            probe::Probe,
        },
        widgets::{Form, Group},
    };

    const RED: Color = Color::rgb(255, 0, 0);
    const GREEN: Color = Color::rgb(0, 255, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);
    const GRAY: Color = Color::rgb(128, 128, 128);

    fn paint(core: &mut Core) -> Result<RecordingBackend> {
        let mut backend = RecordingBackend::new();
        core.render(&mut backend, Duration::ZERO)?;
        Ok(backend)
    }

    /// A 100x100 red parent at (10, 10) with a blue child poking out of
    /// its top-left corner and a green child poking out of its bottom-right.
    fn scene() -> Result<(Core, NodeId, NodeId, NodeId)> {
        let mut core = Core::new(Size::new(200, 200), Options::default())?;
        let root = core.root();
        let parent = core
            .build(Probe::new().painted(RED))?
            .outer(Rect::new(10, 10, 100, 100))
            .attach(root)?;
        let a = core
            .build(Probe::new().painted(BLUE))?
            .outer(Rect::new(-10, -10, 30, 30))
            .attach(parent)?;
        let b = core
            .build(Probe::new().painted(GREEN))?
            .outer(Rect::new(90, 90, 40, 40))
            .attach(parent)?;
        Ok((core, parent, a, b))
    }

    #[test]
    fn children_clip_to_parent_content() -> Result<()> {
        let (mut core, _, _, _) = scene()?;
        let backend = paint(&mut core)?;
        // Children paint back to front: the last child first.
        assert_eq!(
            backend.clips(),
            vec![
                Rect::new(0, 0, 200, 200),
                Rect::new(10, 10, 100, 100),
                Rect::new(100, 100, 10, 10),
                Rect::new(10, 10, 20, 20),
            ]
        );
        assert_eq!(
            backend.fills(),
            vec![
                (Rect::new(10, 10, 100, 100), RED),
                (Rect::new(100, 100, 40, 40), GREEN),
                (Rect::new(0, 0, 30, 30), BLUE),
            ]
        );
        Ok(())
    }

    #[test]
    fn each_node_sets_its_own_clip() -> Result<()> {
        let (mut core, _, a, b) = scene()?;
        // A grandchild narrows the clip inside the green child.
        core.build(Probe::new().painted(GRAY))?
            .outer(Rect::new(0, 0, 2, 2))
            .attach(b)?;
        let backend = paint(&mut core)?;
        let blue = backend
            .calls
            .iter()
            .position(|c| *c == DrawCall::Fill(Rect::new(0, 0, 30, 30), BLUE))
            .ok_or_else(|| Error::InvalidOperation("blue not painted".into()))?;
        assert_eq!(backend.calls[blue - 1], DrawCall::Clip(Rect::new(10, 10, 20, 20)));
        assert_eq!(core.widget::<Probe>(a)?.renders, 1);
        Ok(())
    }

    #[test]
    fn hidden_nodes_are_skipped_with_their_subtrees() -> Result<()> {
        let (mut core, parent, _, _) = scene()?;
        let outside = core
            .build(Probe::new().painted(GRAY))?
            .outer(Rect::new(150, 0, 20, 20))
            .attach(parent)?;
        let nested = core.build(Probe::new())?.outer(Rect::new(0, 0, 5, 5)).attach(outside)?;
        let empty = core
            .build(Probe::new().painted(GRAY))?
            .outer(Rect::new(5, 5, 0, 10))
            .attach(parent)?;
        let backend = paint(&mut core)?;
        assert_eq!(core.widget::<Probe>(outside)?.renders, 0);
        assert_eq!(core.widget::<Probe>(nested)?.renders, 0);
        assert_eq!(core.widget::<Probe>(empty)?.renders, 0);
        assert_eq!(backend.first_fill_of(GRAY), None);
        Ok(())
    }

    #[test]
    fn detached_nodes_are_not_painted() -> Result<()> {
        let (mut core, parent, a, _) = scene()?;
        core.remove(parent, a)?;
        paint(&mut core)?;
        assert_eq!(core.widget::<Probe>(a)?.renders, 0);
        assert_eq!(core.widget::<Probe>(parent)?.renders, 1);
        Ok(())
    }

    #[test]
    fn borders_inset_the_content_clip() -> Result<()> {
        let mut core = Core::new(Size::new(200, 200), Options::default())?;
        let root = core.root();
        let skin = GroupLayoutSkin {
            border: Insets::uniform(5),
            border_color: GRAY,
            background_color: RED,
        };
        let group = core
            .build(Group::new().with_skin(skin))?
            .outer(Rect::new(20, 20, 60, 60))
            .attach(root)?;
        core.build(Probe::new().painted(BLUE))?
            .outer(Rect::new(0, 0, 100, 100))
            .attach(group)?;
        let backend = paint(&mut core)?;
        assert_eq!(backend.clips().last(), Some(&Rect::new(25, 25, 50, 50)));
        assert_eq!(
            backend.fills(),
            vec![
                (Rect::new(20, 20, 60, 60), GRAY),
                (Rect::new(25, 25, 50, 50), RED),
                (Rect::new(25, 25, 100, 100), BLUE),
            ]
        );
        Ok(())
    }

    #[test]
    fn form_title_is_drawn() -> Result<()> {
        let mut gui = Gui::new(Size::new(200, 200), Options::default())?;
        let root = gui.root();
        gui.core_mut()
            .build(Form::new("Layers"))?
            .outer(Rect::new(10, 10, 100, 80))
            .attach(root)?;
        let mut backend = RecordingBackend::new();
        gui.render(&mut backend)?;
        let text = backend.calls.iter().find_map(|c| match c {
            DrawCall::Text(at, s, _) => Some((*at, s.clone())),
            _ => None,
        });
        // Border 2 plus title padding 2.
        assert_eq!(text, Some((Point::new(14, 14), "Layers".to_string())));
        Ok(())
    }
}
