use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DeckError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(DeckError::surface("x").to_string().contains("surface error:"));
    assert!(DeckError::encode("x").to_string().contains("encode error:"));
    assert!(
        DeckError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DeckError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
