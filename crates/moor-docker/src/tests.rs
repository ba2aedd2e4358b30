#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::{
        load_settings_from, save_settings_to, CloseOutcome, DockSession, DockSettings, DockState, Docker,
        DragOutcome,
    };
    use moor_core::{
        DockError, DockPosition, DockTarget, Edge, GeometryProvider, HitTest, NodeId, PaneId, Rect, Size, Vec2,
    };

    const FRAME: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 800.0,
        height: 600.0,
    };

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    fn rect_approx_eq(a: &Rect, b: &Rect) -> bool {
        approx_eq(a.x, b.x)
            && approx_eq(a.y, b.y)
            && approx_eq(a.width, b.width)
            && approx_eq(a.height, b.height)
    }

    /// A host with nothing laid out.
    struct NoHost;

    impl GeometryProvider for NoHost {
        fn region_rect(&self, _region: NodeId) -> Option<Rect> {
            None
        }
    }

    impl HitTest for NoHost {
        fn region_at(&self, _point: Vec2) -> Option<NodeId> {
            None
        }
    }

    type Log = Rc<RefCell<Vec<(&'static str, PaneId)>>>;

    fn record(docker: &mut Docker<&'static str>, pane: PaneId) -> Log {
        let log: Log = Rc::default();
        let (dock, undock, close) = (log.clone(), log.clone(), log.clone());
        docker.set_on_dock(pane, move |p| dock.borrow_mut().push(("dock", p))).unwrap();
        docker.set_on_undock(pane, move |p| undock.borrow_mut().push(("undock", p))).unwrap();
        docker.set_on_close(pane, move |p| close.borrow_mut().push(("close", p))).unwrap();
        log
    }

    /// P1 docked left and P2 docked right.
    fn two_docked() -> (Docker<&'static str>, PaneId, PaneId) {
        let mut docker = Docker::new(FRAME);
        let p1 = docker.create_pane("One", "c1", DockPosition::Left);
        let p2 = docker.create_pane("Two", "c2", DockPosition::Right);
        (docker, p1, p2)
    }

    /// Press on P1 at (100, 100) and drag 50px right, tearing it off.
    fn torn_off() -> (Docker<&'static str>, PaneId, PaneId) {
        let (mut docker, p1, p2) = two_docked();
        docker.press(p1, Vec2::new(100.0, 100.0)).unwrap();
        let host = docker.layout();
        docker.drag(Vec2::new(150.0, 100.0), &host).unwrap();
        (docker, p1, p2)
    }

    // ──────────────────────────────────────────
    // Pane creation
    // ──────────────────────────────────────────

    #[test]
    fn test_create_docked_on_empty_frame() {
        let mut docker = Docker::new(FRAME);
        let p1 = docker.create_pane("T1", "C1", DockPosition::Left);

        assert_eq!(docker.tree().describe(), "H[](#1)");
        assert!(docker.layout().dividers.is_empty());
        assert!(matches!(docker.dock_state(p1), Some(DockState::Embedded(_))));
        assert_eq!(docker.pane_rect(p1), Some(FRAME));
        assert!(docker.is_consistent());
    }

    #[test]
    fn test_create_two_docked_panes() {
        let (docker, p1, p2) = two_docked();
        assert_eq!(docker.tree().describe(), "H[0.50](#1 | #2)");
        assert!(rect_approx_eq(&docker.pane_rect(p1).unwrap(), &Rect::new(0.0, 0.0, 400.0, 600.0)));
        assert!(rect_approx_eq(&docker.pane_rect(p2).unwrap(), &Rect::new(400.0, 0.0, 400.0, 600.0)));
    }

    #[test]
    fn test_create_floating_centers_and_cascades() {
        let mut docker = Docker::new(FRAME);
        let a = docker.create_pane("A", "a", DockPosition::None);
        let b = docker.create_pane("B", "b", DockPosition::None);
        let c = docker.create_pane_sized("C", "c", DockPosition::None, Some(Size::new(100.0, 50.0)));

        assert_eq!(docker.pane_rect(a), Some(Rect::new(275.0, 200.0, 250.0, 200.0)));
        assert_eq!(docker.pane_rect(b), Some(Rect::new(299.0, 224.0, 250.0, 200.0)));
        assert_eq!(docker.pane_rect(c), Some(Rect::new(398.0, 323.0, 100.0, 50.0)));
        assert_eq!(docker.dock_state(a), Some(DockState::Floating));
        assert!(docker.tree().is_empty());
        assert!(docker.is_consistent());
    }

    #[test]
    fn test_title_and_content_accessors() {
        let (mut docker, p1, _) = two_docked();
        assert_eq!(docker.title(p1), Some("One"));
        assert_eq!(docker.content(p1), Some(&"c1"));

        docker.set_title(p1, "Renamed").unwrap();
        assert_eq!(docker.title(p1), Some("Renamed"));
        assert_eq!(docker.set_content(p1, "new"), Ok("c1"));
        assert_eq!(docker.content(p1), Some(&"new"));
        assert_eq!(docker.set_title(99, "x"), Err(DockError::UnknownPane(99)));

        *docker.content_mut(p1).unwrap() = "edited";
        assert_eq!(docker.content(p1), Some(&"edited"));
        assert!(docker.content_mut(99).is_none());
        assert_eq!(docker.frame(), FRAME);
        assert_eq!(*docker.settings(), DockSettings::default());
    }

    #[test]
    fn test_with_settings_and_set_frame_rect() {
        let settings = DockSettings {
            undock_threshold: 5.0,
            ..DockSettings::default()
        };
        let mut docker: Docker<&'static str> = Docker::with_settings(FRAME, settings.clone());
        assert_eq!(*docker.settings(), settings);

        let moved = Rect::new(10.0, 20.0, 640.0, 480.0);
        docker.set_frame_rect(moved);
        assert_eq!(docker.frame(), moved);
    }

    // ──────────────────────────────────────────
    // Direct tree edits through the facade
    // ──────────────────────────────────────────

    #[test]
    fn test_remove_then_insert_fires_listeners() {
        let (mut docker, p1, p2) = two_docked();
        let log = record(&mut docker, p1);

        let host = docker.layout();
        let prior = docker.remove(p1, &host).unwrap();
        assert!(rect_approx_eq(&prior, &Rect::new(0.0, 0.0, 400.0, 600.0)));
        assert_eq!(docker.floating_pane(p1).map(|f| f.rect), Some(prior));
        assert_eq!(docker.tree().describe(), "H[](#2)");
        assert!(docker.is_consistent());

        let g2 = docker.tree().group_of(p2).unwrap();
        docker.insert(p1, Some(g2), Edge::Top).unwrap();
        assert_eq!(docker.tree().describe(), "V[0.50](#1 | #2)");
        assert!(docker.floating_pane(p1).is_none());
        assert_eq!(*log.borrow(), vec![("undock", p1), ("dock", p1)]);
        assert!(docker.is_consistent());
    }

    #[test]
    fn test_facade_errors() {
        let (mut docker, p1, _) = two_docked();
        assert_eq!(docker.insert(42, None, Edge::Left), Err(DockError::UnknownPane(42)));
        assert_eq!(docker.insert(p1, None, Edge::Left), Err(DockError::AlreadyEmbedded(p1)));

        let floating = docker.create_pane("F", "f", DockPosition::None);
        assert_eq!(docker.remove(floating, &NoHost), Err(DockError::NotEmbedded(floating)));
        assert_eq!(docker.bring_to_front(p1), Err(DockError::AlreadyEmbedded(p1)));
    }

    #[test]
    fn test_reformat_and_resolve() {
        let (mut docker, _, p2) = two_docked();
        let g2 = docker.tree().group_of(p2).unwrap();
        let p3 = docker.create_pane("3", "c3", DockPosition::None);
        docker.insert(p3, Some(g2), Edge::Left).unwrap();
        assert_eq!(docker.tree().describe(), "H[0.50,0.75](#1 | #3 | #2)");

        docker.reformat();
        assert_eq!(docker.tree().describe(), "H[0.33,0.67](#1 | #3 | #2)");

        let rects = docker.layout().region_rects();
        let hit = docker.resolve_edge(Vec2::new(10.0, 300.0), &rects, true).unwrap();
        assert_eq!((hit.region, hit.edge), (Some(0), Edge::Left));
    }

    #[test]
    fn test_bring_to_front() {
        let mut docker = Docker::new(FRAME);
        let a = docker.create_pane("A", "a", DockPosition::None);
        let b = docker.create_pane("B", "b", DockPosition::None);

        docker.bring_to_front(a).unwrap();
        let order: Vec<PaneId> = docker.floating().iter().map(|f| f.pane).collect();
        assert_eq!(order, vec![b, a]);
    }

    // ──────────────────────────────────────────
    // Drag session
    // ──────────────────────────────────────────

    #[test]
    fn test_short_drag_does_not_undock() {
        let (mut docker, p1, _) = two_docked();
        let log = record(&mut docker, p1);
        let before = docker.tree().describe();

        docker.press(p1, Vec2::new(100.0, 100.0)).unwrap();
        let host = docker.layout();
        docker.drag(Vec2::new(110.0, 105.0), &host).unwrap();
        docker.drag(Vec2::new(115.0, 110.0), &host).unwrap();

        assert!(matches!(docker.session(), DockSession::DraggingEmbedded { pane, .. } if *pane == p1));
        assert_eq!(docker.tree().describe(), before);
        assert!(log.borrow().is_empty());
        assert!(docker.floating().is_empty());
    }

    #[test]
    fn test_click_release_is_unchanged() {
        let (mut docker, p1, _) = two_docked();
        docker.press(p1, Vec2::new(100.0, 100.0)).unwrap();
        assert_eq!(docker.release(Vec2::new(100.0, 100.0)), Ok(DragOutcome::Unchanged));
        assert_eq!(*docker.session(), DockSession::Idle);
        assert_eq!(docker.tree().describe(), "H[0.50](#1 | #2)");
    }

    #[test]
    fn test_long_drag_tears_off() {
        let (mut docker, p1, _) = two_docked();
        let log = record(&mut docker, p1);

        docker.press(p1, Vec2::new(100.0, 100.0)).unwrap();
        let host = docker.layout();
        docker.drag(Vec2::new(150.0, 100.0), &host).unwrap();

        assert_eq!(docker.tree().describe(), "H[](#2)");
        let floating = docker.floating_pane(p1).copied().unwrap();
        assert!(rect_approx_eq(&floating.rect, &Rect::new(50.0, 0.0, 400.0, 600.0)));
        assert!(approx_eq(floating.opacity, 0.5));
        assert!(matches!(
            docker.session(),
            DockSession::DraggingFloating { indicator: None, .. }
        ));
        assert_eq!(*log.borrow(), vec![("undock", p1)]);
        assert!(docker.is_consistent());
    }

    #[test]
    fn test_floating_drag_follows_pointer() {
        let (mut docker, p1, _) = torn_off();
        let host = docker.layout();
        docker.drag(Vec2::new(160.0, 110.0), &host).unwrap();

        let rect = docker.pane_rect(p1).unwrap();
        assert!(approx_eq(rect.x, 60.0));
        assert!(approx_eq(rect.y, 10.0));
    }

    #[test]
    fn test_release_on_region_indicator_docks() {
        let (mut docker, p1, p2) = torn_off();
        let log = record(&mut docker, p1);
        let g2 = docker.tree().group_of(p2).unwrap();

        let host = docker.layout();
        docker.drag(Vec2::new(700.0, 300.0), &host).unwrap();
        let indicator = *docker.indicator().unwrap();
        assert_eq!(indicator.target, DockTarget::Region(g2, Edge::Right));
        assert!(rect_approx_eq(&indicator.rect, &Rect::new(767.5, 287.5, 25.0, 25.0)));

        let outcome = docker.release(Vec2::new(780.0, 300.0)).unwrap();
        assert_eq!(outcome, DragOutcome::Docked(DockTarget::Region(g2, Edge::Right)));
        assert_eq!(docker.tree().describe(), "H[0.50](#2 | #1)");
        assert!(docker.floating().is_empty());
        assert_eq!(*docker.session(), DockSession::Idle);
        assert_eq!(*log.borrow(), vec![("dock", p1)]);
        assert!(docker.is_consistent());
    }

    #[test]
    fn test_release_on_center_indicator_adds_tab() {
        let (mut docker, p1, _) = two_docked();
        let p3 = docker.create_pane("Three", "c3", DockPosition::None);
        let g1 = docker.tree().group_of(p1).unwrap();

        docker.press(p3, Vec2::new(285.0, 210.0)).unwrap();
        let host = docker.layout();
        docker.drag(Vec2::new(200.0, 300.0), &host).unwrap();
        let indicator = *docker.indicator().unwrap();
        assert_eq!(indicator.target, DockTarget::Region(g1, Edge::Center));
        assert!(rect_approx_eq(&indicator.rect, &Rect::new(187.5, 287.5, 25.0, 25.0)));

        docker.release(Vec2::new(200.0, 300.0)).unwrap();
        assert_eq!(docker.tree().describe(), "H[0.50](#1+#3 | #2)");
        assert_eq!(docker.tree().tab_group(g1).unwrap().active(), Some(p3));
    }

    #[test]
    fn test_release_over_region_closed_mid_drag_stays_floating() {
        let (mut docker, p1, p2) = two_docked();
        let p3 = docker.create_pane("Three", "c3", DockPosition::None);
        docker.set_dock_on_close(p1, false).unwrap();
        let g1 = docker.tree().group_of(p1).unwrap();

        docker.press(p3, Vec2::new(285.0, 210.0)).unwrap();
        let host = docker.layout();
        docker.drag(Vec2::new(25.0, 300.0), &host).unwrap();
        assert_eq!(docker.indicator().unwrap().target, DockTarget::Region(g1, Edge::Left));

        assert!(matches!(docker.close_pane(p1), Ok(CloseOutcome::Destroyed("c1"))));
        assert_eq!(docker.release(Vec2::new(25.0, 300.0)), Ok(DragOutcome::Floating));
        assert_eq!(docker.tree().describe(), format!("H[](#{p2})"));
        assert_eq!(docker.dock_state(p3), Some(DockState::Floating));
        assert!(approx_eq(docker.floating_pane(p3).unwrap().opacity, 1.0));
        assert_eq!(*docker.session(), DockSession::Idle);
        assert!(docker.is_consistent());
    }

    #[test]
    fn test_release_away_from_indicator_stays_floating() {
        let (mut docker, p1, _) = torn_off();
        let host = docker.layout();
        docker.drag(Vec2::new(700.0, 300.0), &host).unwrap();
        assert!(docker.indicator().is_some());

        assert_eq!(docker.release(Vec2::new(100.0, 100.0)), Ok(DragOutcome::Floating));
        assert_eq!(docker.tree().describe(), "H[](#2)");
        assert!(approx_eq(docker.floating_pane(p1).unwrap().opacity, 1.0));
        assert_eq!(*docker.session(), DockSession::Idle);
    }

    #[test]
    fn test_frame_body_offers_no_indicator() {
        let mut docker: Docker<&'static str> = Docker::new(FRAME);
        let p1 = docker.create_pane("F", "f", DockPosition::None);

        docker.press(p1, Vec2::new(285.0, 210.0)).unwrap();
        docker.drag(Vec2::new(400.0, 300.0), &NoHost).unwrap();
        assert!(docker.indicator().is_none());

        // Within the outside offset of the frame edge.
        docker.drag(Vec2::new(5.0, 300.0), &NoHost).unwrap();
        let indicator = docker.indicator().copied().unwrap();
        assert_eq!(indicator.target, DockTarget::Frame(Edge::Left));

        assert_eq!(docker.release(Vec2::new(400.0, 300.0)), Ok(DragOutcome::Floating));
        assert!(docker.tree().is_empty());
    }

    #[test]
    fn test_release_outside_frame_docks_to_frame_edge() {
        let mut docker = Docker::new(FRAME);
        let p1 = docker.create_pane("One", "c1", DockPosition::Left);
        let p2 = docker.create_pane("Two", "c2", DockPosition::None);

        docker.press(p2, Vec2::new(285.0, 210.0)).unwrap();
        docker.drag(Vec2::new(-30.0, 300.0), &NoHost).unwrap();
        let indicator = *docker.indicator().unwrap();
        assert_eq!(indicator.target, DockTarget::Frame(Edge::Left));
        assert!(rect_approx_eq(&indicator.rect, &Rect::new(-22.5, 287.5, 25.0, 25.0)));

        let outcome = docker.release(Vec2::new(-10.0, 300.0)).unwrap();
        assert_eq!(outcome, DragOutcome::Docked(DockTarget::Frame(Edge::Left)));
        assert_eq!(docker.tree().describe(), format!("H[0.50](#{p2} | #{p1})"));
        assert!(docker.is_consistent());
    }

    #[test]
    fn test_cancel_discards_session() {
        let (mut docker, p1, _) = torn_off();
        let host = docker.layout();
        docker.drag(Vec2::new(700.0, 300.0), &host).unwrap();

        docker.cancel();
        assert_eq!(*docker.session(), DockSession::Idle);
        assert_eq!(docker.tree().describe(), "H[](#2)");
        assert!(approx_eq(docker.floating_pane(p1).unwrap().opacity, 1.0));
        assert_eq!(docker.release(Vec2::new(780.0, 300.0)), Ok(DragOutcome::Unchanged));
    }

    #[test]
    fn test_press_errors() {
        let (mut docker, p1, p2) = two_docked();
        assert_eq!(docker.press(77, Vec2::new(0.0, 0.0)), Err(DockError::UnknownPane(77)));

        docker.press(p1, Vec2::new(100.0, 100.0)).unwrap();
        assert_eq!(docker.press(p2, Vec2::new(500.0, 100.0)), Err(DockError::SessionActive));
    }

    #[test]
    fn test_opaque_on_drag_setting() {
        let settings = DockSettings {
            opaque_on_drag: true,
            undock_threshold: 5.0,
            ..DockSettings::default()
        };
        let mut docker = Docker::with_settings(FRAME, settings);
        let p1 = docker.create_pane("One", "c1", DockPosition::Left);
        docker.create_pane("Two", "c2", DockPosition::Right);

        docker.press(p1, Vec2::new(100.0, 100.0)).unwrap();
        let host = docker.layout();
        docker.drag(Vec2::new(108.0, 100.0), &host).unwrap();
        let floating = docker.floating_pane(p1).unwrap();
        assert!(approx_eq(floating.opacity, 1.0));
    }

    // ──────────────────────────────────────────
    // Closing
    // ──────────────────────────────────────────

    #[test]
    fn test_close_floating_docks_at_nearest_side() {
        let mut docker = Docker::new(FRAME);
        let p1 = docker.create_pane("F", "f", DockPosition::None);
        let log = record(&mut docker, p1);

        // Centered exactly: Top and Bottom tie, Top wins.
        assert!(matches!(docker.close_pane(p1), Ok(CloseOutcome::Docked(Edge::Top))));
        assert_eq!(docker.tree().describe(), "V[](#1)");
        assert_eq!(*log.borrow(), vec![("dock", p1)]);
        assert!(docker.is_consistent());
    }

    #[test]
    fn test_close_floating_near_right_side() {
        let mut docker = Docker::new(FRAME);
        docker.create_pane("Left", "l", DockPosition::Left);
        let p2 = docker.create_pane_sized("F", "f", DockPosition::None, Some(Size::new(100.0, 100.0)));

        docker.press(p2, Vec2::new(360.0, 260.0)).unwrap();
        docker.drag(Vec2::new(740.0, 260.0), &NoHost).unwrap();
        docker.release(Vec2::new(740.0, 260.0)).unwrap();

        assert!(matches!(docker.close_pane(p2), Ok(CloseOutcome::Docked(Edge::Right))));
        assert_eq!(docker.tree().describe(), "H[0.50](#1 | #2)");
    }

    #[test]
    fn test_close_embedded_is_already_docked() {
        let (mut docker, p1, _) = two_docked();
        assert!(matches!(docker.close_pane(p1), Ok(CloseOutcome::AlreadyDocked)));
        assert_eq!(docker.tree().describe(), "H[0.50](#1 | #2)");
    }

    #[test]
    fn test_close_without_dock_on_close_destroys() {
        let (mut docker, p1, p2) = two_docked();
        let floating = docker.create_pane("Closable", "gone", DockPosition::None);
        let log = record(&mut docker, floating);
        docker.set_dock_on_close(floating, false).unwrap();

        assert!(matches!(docker.close_pane(floating), Ok(CloseOutcome::Destroyed("gone"))));
        assert_eq!(*log.borrow(), vec![("close", floating)]);
        assert!(docker.pane(floating).is_none());
        assert!(docker.floating().is_empty());

        docker.set_dock_on_close(p1, false).unwrap();
        assert!(matches!(docker.close_pane(p1), Ok(CloseOutcome::Destroyed("c1"))));
        assert_eq!(docker.tree().describe(), format!("H[](#{p2})"));
        assert!(docker.is_consistent());
        assert!(matches!(docker.close_pane(p1), Err(DockError::UnknownPane(_))));
    }

    #[test]
    fn test_close_frame_destroys_floating() {
        let (mut docker, p1, _) = torn_off();
        let other = docker.create_pane("Other", "o", DockPosition::None);

        let closed = docker.close_frame();
        assert_eq!(closed, vec![(p1, "c1"), (other, "o")]);
        assert_eq!(*docker.session(), DockSession::Idle);
        assert!(docker.floating().is_empty());
        assert_eq!(docker.tree().describe(), "H[](#2)");
        assert!(docker.is_consistent());
    }

    #[test]
    fn test_frame_resize_moves_regions() {
        let (mut docker, p1, _) = two_docked();
        docker.set_frame_rect(Rect::new(0.0, 0.0, 1000.0, 500.0));
        assert!(rect_approx_eq(&docker.pane_rect(p1).unwrap(), &Rect::new(0.0, 0.0, 500.0, 500.0)));
    }

    // ──────────────────────────────────────────
    // Settings
    // ──────────────────────────────────────────

    #[test]
    fn test_settings_defaults() {
        let settings = DockSettings::default();
        assert_eq!(settings.undock_threshold, 20.0);
        assert_eq!(settings.dock_outside_offset, 10.0);
        assert_eq!(settings.default_floating_size, Size::new(250.0, 200.0));
        assert_eq!(settings.indicator_size, Size::new(25.0, 25.0));
        assert!(!settings.opaque_on_drag);
        assert_eq!(DockSettings::from_json("{}").unwrap(), settings);
    }

    #[test]
    fn test_settings_partial_json() {
        let settings = DockSettings::from_json(
            r#"{"undock_threshold": 5.0, "opaque_on_drag": true,
               "default_floating_size": {"width": 300.0, "height": 100.0}}"#,
        )
        .unwrap();
        assert_eq!(settings.undock_threshold, 5.0);
        assert!(settings.opaque_on_drag);
        assert_eq!(settings.default_floating_size, Size::new(300.0, 100.0));
        assert_eq!(settings.drag_opacity, 0.5);
        assert!(DockSettings::from_json("{not json").is_err());
    }

    #[test]
    fn test_settings_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moor").join("settings.json");
        assert_eq!(load_settings_from(&path), DockSettings::default());

        let settings = DockSettings {
            drag_opacity: 0.25,
            opaque_on_drag: true,
            ..DockSettings::default()
        };
        save_settings_to(&settings, &path).unwrap();
        assert_eq!(load_settings_from(&path), settings);

        std::fs::write(&path, "{\"drag_opacity\": \"half\"").unwrap();
        assert_eq!(load_settings_from(&path), DockSettings::default());
    }
}
