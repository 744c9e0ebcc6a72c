use super::*;

#[test]
fn href_points_at_workspace_route() {
    assert_eq!(project_href("abc-123"), "/project/abc-123");
}
