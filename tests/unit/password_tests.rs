use backend_lib::auth::{validate_password_strength, verify_password, PasswordRequirements};
use backend_lib::auth::password::hash_password_with;

fn fast_params() -> scrypt::Params {
    scrypt::Params::new(4, 8, 1, scrypt::Params::RECOMMENDED_LEN).unwrap()
}

#[test]
fn test_password_hashing_and_verification() {
    let password = "SecureP@ssw0rd";
    let hash = hash_password_with(password, fast_params()).unwrap();

    assert_ne!(password, hash);
    assert!(verify_password(&hash, password));
    assert!(!verify_password(&hash, "WrongP@ssw0rd"));
    assert!(!verify_password("not-a-phc-string", password));
}

#[test]
fn test_hashes_are_salted() {
    let first = hash_password_with("SecureP@ssw0rd", fast_params()).unwrap();
    let second = hash_password_with("SecureP@ssw0rd", fast_params()).unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_password_strength_validation() {
    let requirements = PasswordRequirements::default();

    // Valid password
    assert!(validate_password_strength("SecureP@ssw0rd", &requirements));

    // Too short
    assert!(!validate_password_strength("Sh0rt!", &requirements));

    // Missing uppercase
    assert!(!validate_password_strength("securep@ssw0rd", &requirements));

    // Missing lowercase
    assert!(!validate_password_strength("SECUREP@SSW0RD", &requirements));

    // Missing digit
    assert!(!validate_password_strength("SecureP@ssword", &requirements));

    // Missing special character
    assert!(!validate_password_strength("SecurePassw0rd", &requirements));

    let relaxed = PasswordRequirements {
        require_special: false,
        ..PasswordRequirements::default()
    };
    assert!(validate_password_strength("SecurePassw0rd", &relaxed));
}
