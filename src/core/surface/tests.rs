use crate::core::surface::*;
use crate::core::errors::CoreError;

#[test]
fn test_surface_init() {
    let surface = Surface::new(1);
    assert_eq!(surface.id, 1);
    assert!(surface.role.is_none());
    assert_eq!(surface.parent, None);
}

#[test]
fn test_surface_commit() {
    let mut surface = Surface::new(1);

    assert_eq!(surface.current.width, 0);
    assert_eq!(surface.current.height, 0);

    surface.pending.width = 100;
    surface.pending.height = 200;
    assert!(surface.commit());

    assert_eq!(surface.current.width, 100);
    assert_eq!(surface.current.height, 200);

    // Nothing new pending
    assert!(!surface.commit());
}

#[test]
fn test_surface_role_is_sticky() {
    let mut surface = Surface::new(7);
    surface.set_role(SurfaceRole::Toplevel(1)).unwrap();

    // Same kind with a new owner is allowed (role object recreated)
    surface.set_role(SurfaceRole::Toplevel(2)).unwrap();
    assert_eq!(surface.role, SurfaceRole::Toplevel(2));

    match surface.set_role(SurfaceRole::Popup(3)) {
        Err(CoreError::RoleConflict { surface_id, existing, requested }) => {
            assert_eq!(surface_id, 7);
            assert_eq!(existing, "toplevel");
            assert_eq!(requested, "popup");
        }
        other => panic!("expected role conflict, got {:?}", other),
    }
}
