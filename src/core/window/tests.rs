#[cfg(test)]
mod tests {
    use crate::core::window::focus::FocusManager;
    use crate::core::window::grab::{CursorMode, GestureGrab};
    use crate::core::window::placement::area_fits;
    use crate::core::window::resize::{compute_resize, nearest_edges, ResizeEdges};
    use crate::core::window::shell::{
        truncate_x11, ShellInterface, ShellRequest, ShellSurface, SizeHints, XdgToplevel, XwaylandSurface,
    };
    use crate::core::window::tree::WindowTree;
    use crate::core::window::Window;
    use crate::util::geometry::{Point, Rect, Size};

    fn xdg_window(current: Rect, min: Size) -> Window {
        let mut toplevel = XdgToplevel::new().with_size_hints(min, Size::default());
        toplevel.buffer_committed(current.width, current.height);
        let mut window = Window::new(1, 10, ShellSurface::from(toplevel), 100, 101, 1);
        window.current = current;
        window.previous = current;
        window
    }

    #[test]
    fn test_window_tree_operations() {
        let mut tree = WindowTree::new();

        tree.insert(1);
        tree.insert(2);
        tree.insert(3);
        assert_eq!(tree.stacking_order, vec![1, 2, 3]);
        assert_eq!(tree.topmost(|_| true), Some(3));

        tree.bring_to_front(1);
        assert_eq!(tree.stacking_order, vec![2, 3, 1]);
        assert_eq!(tree.topmost(|_| true), Some(1));
        assert_eq!(tree.bottommost(|id| id != 2), Some(3));

        tree.remove(3);
        assert_eq!(tree.stacking_order, vec![2, 1]);

        tree.insert(2);
        assert_eq!(tree.stacking_order, vec![2, 1]);
        assert_eq!(tree.count(|_| true), 2);
    }

    #[test]
    fn test_focus_manager_forgets_destroyed_window() {
        let mut focus = FocusManager::new();
        focus.focused_window = Some(1);
        focus.keyboard_focus = Some(10);
        focus.pointer_focus = Some(10);

        assert!(focus.has_keyboard_focus(10));
        assert!(focus.forget_window(1, 10));
        assert_eq!(focus.focused_window, None);
        assert_eq!(focus.keyboard_focus, None);
        assert_eq!(focus.pointer_focus, None);
        assert!(!focus.forget_window(1, 10));
    }

    #[test]
    fn test_grab_is_replaced_not_stacked() {
        let mut grab = GestureGrab::default();
        assert!(!grab.is_active());

        grab.begin_move(1, Point::new(50.0, 50.0), Rect::new(10, 20, 100, 100));
        assert_eq!(grab.mode, CursorMode::Move);
        assert!(grab.is_grabbing(1));

        grab.begin_resize(2, Point::new(0.0, 0.0), Rect::new(0, 0, 10, 10), ResizeEdges::RIGHT);
        assert!(!grab.is_grabbing(1));
        assert!(grab.is_grabbing(2));
        assert_eq!(grab.origin, Point::new(-10.0, 0.0));

        grab.clear();
        assert_eq!(grab.mode, CursorMode::Passthrough);
        assert_eq!(grab.window, None);
    }

    #[test]
    fn test_move_target_floors_y() {
        let mut grab = GestureGrab::default();
        grab.begin_move(1, Point::new(50.0, 50.0), Rect::new(10, 20, 100, 100));
        assert_eq!(grab.move_target(Point::new(60.4, 70.6)), (20, 41));
        assert_eq!(grab.move_target(Point::new(60.0, 0.0)), (20, 0));
    }

    #[test]
    fn test_nearest_edges() {
        let geo = Rect::new(0, 0, 100, 100);
        assert_eq!(nearest_edges(&geo, Point::new(10.0, 90.0)), ResizeEdges::LEFT | ResizeEdges::BOTTOM);
        assert_eq!(nearest_edges(&geo, Point::new(80.0, 5.0)), ResizeEdges::RIGHT | ResizeEdges::TOP);
        assert_eq!(nearest_edges(&geo, Point::new(50.0, 50.0)), ResizeEdges::LEFT | ResizeEdges::TOP);
    }

    #[test]
    fn test_resize_left_edge_cannot_cross_right() {
        let window = xdg_window(Rect::new(0, 0, 100, 100), Size::default());
        let mut grab = GestureGrab::default();
        grab.begin_resize(1, Point::new(0.0, 50.0), window.geometry_box(), ResizeEdges::LEFT);

        let rect = compute_resize(&grab, Point::new(150.0, 50.0), &window);
        assert_eq!(rect, Rect::new(99, 0, 1, 100));
    }

    #[test]
    fn test_resize_bottom_right_grows() {
        let window = xdg_window(Rect::new(10, 10, 100, 100), Size::default());
        let mut grab = GestureGrab::default();
        let edges = ResizeEdges::RIGHT | ResizeEdges::BOTTOM;
        grab.begin_resize(1, Point::new(108.0, 108.0), window.geometry_box(), edges);

        let rect = compute_resize(&grab, Point::new(158.0, 128.0), &window);
        assert_eq!(rect, Rect::new(10, 10, 150, 120));
    }

    #[test]
    fn test_resize_pinned_at_min_keeps_position() {
        let window = xdg_window(Rect::new(0, 0, 100, 100), Size::new(100, 100));
        let mut grab = GestureGrab::default();
        grab.begin_resize(1, Point::new(0.0, 0.0), window.geometry_box(), ResizeEdges::LEFT | ResizeEdges::TOP);

        let rect = compute_resize(&grab, Point::new(40.0, 30.0), &window);
        assert_eq!(rect, Rect::new(0, 0, 100, 100));
    }

    #[test]
    fn test_area_fits() {
        let area = Rect::new(0, 0, 1920, 1040);
        assert!(area_fits(&area, Size::new(50, 50), Size::UNBOUNDED));
        assert!(!area_fits(&area, Size::default(), Size::new(1000, 1000)));
        assert!(!area_fits(&area, Size::new(2000, 0), Size::UNBOUNDED));
    }

    #[test]
    fn test_xdg_size_hints() {
        let toplevel = XdgToplevel::new().with_size_hints(Size::new(50, 40), Size::new(0, 300));
        assert_eq!(toplevel.min_size(), Size::new(50, 40));
        assert_eq!(toplevel.max_size(), Size::new(i32::MAX, 300));
    }

    #[test]
    fn test_xdg_requests_are_size_only() {
        let mut toplevel = XdgToplevel::new();
        toplevel.impl_set_position(10, 10, Rect::new(0, 0, 100, 100));
        toplevel.impl_set_geometry(Rect::new(10, 20, 300, 200));
        toplevel.impl_set_activated(true);
        toplevel.negotiate_decoration();
        assert_eq!(
            toplevel.take_requests(),
            vec![
                ShellRequest::Configure { x: None, y: None, width: 300, height: 200 },
                ShellRequest::Activated(true),
                ShellRequest::DecorationMode(crate::core::window::DecorationMode::ServerSide),
            ]
        );
        assert!(toplevel.take_requests().is_empty());
    }

    #[test]
    fn test_xwayland_hints_and_configure() {
        let hints = SizeHints {
            min: Size::new(10, 10),
            base: Size::new(20, 5),
            max: Size::default(),
        };
        let mut surface = XwaylandSurface::new(Rect::new(0, 0, 100, 100)).with_size_hints(hints);
        assert_eq!(surface.min_size(), Size::new(20, 10));
        assert_eq!(surface.max_size(), Size::new(65535, 65535));

        surface.impl_set_position(40_000, -5, Rect::new(0, 0, 100, 100));
        surface.impl_set_activated(true);
        assert_eq!(surface.area, Rect::new(32767, -5, 100, 100));
        assert_eq!(surface.geometry(), Rect::new(0, 0, 100, 100));
        assert_eq!(
            surface.take_requests(),
            vec![
                ShellRequest::Configure { x: Some(32767), y: Some(-5), width: 100, height: 100 },
                ShellRequest::Activated(true),
                ShellRequest::RaiseToTop,
            ]
        );
        assert_eq!(truncate_x11(-40_000), -32768);
    }
}
