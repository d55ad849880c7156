use super::*;

#[test]
fn reserved() {
    assert!(is_reserved("select"));
    assert!(is_reserved("UNIQUE"));
    assert!(is_reserved("Migration"));
    assert!(!is_reserved("users"));
    assert!(!is_reserved("users_email_unique"));
}
