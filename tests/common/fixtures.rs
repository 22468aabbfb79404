//! Binary fixtures shared by the integration tests.

/// DejaVu Sans, a TrueType font with Latin, Greek and Cyrillic coverage.
pub const DEJAVU_SANS: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/fonts/DejaVuSans.ttf"
);

pub fn dejavu_sans() -> Vec<u8> {
    std::fs::read(DEJAVU_SANS).expect("font fixture")
}

/// A font node declaring one normal/400 variant of `family`.
pub fn font_node(family: &str, src: &str) -> String {
    format!(
        r#"<span data-svelte-pdf-kit-type="font" data-svelte-pdf-kit-font-family="{}" data-svelte-pdf-kit-fonts="{}"></span>"#,
        family,
        super::encode_attribute(&format!(r#"[{{"src":"{}"}}]"#, src))
    )
}
