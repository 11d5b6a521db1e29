/// Turns a GraphQL name into the type-like name generated code uses.
///
/// Segments are split on `_` and `-`. Each segment gets an upper-case first letter;
/// a segment written entirely in upper case (the usual enum value style) is lowered
/// after its first letter. `RED` becomes `Red`, `ORANGE_RED` becomes `OrangeRed`,
/// `fooBar` becomes `FooBar`.
pub fn to_class_name(name: &str) -> String {
    let mut class_name = String::with_capacity(name.len());

    for segment in name.split(['_', '-']).filter(|s| !s.is_empty()) {
        let shouting = !segment.chars().any(|c| c.is_ascii_lowercase());
        let mut chars = segment.chars();

        if let Some(first) = chars.next() {
            class_name.extend(first.to_uppercase());
        }

        if shouting {
            class_name.extend(chars.flat_map(|c| c.to_lowercase()));
        } else {
            class_name.extend(chars);
        }
    }

    if class_name.is_empty() {
        name.to_string()
    } else {
        class_name
    }
}

#[test]
fn class_names() {
    assert_eq!(to_class_name("RED"), "Red");
    assert_eq!(to_class_name("ORANGE_RED"), "OrangeRed");
    assert_eq!(to_class_name("fooBar"), "FooBar");
    assert_eq!(to_class_name("GetPet"), "GetPet");
    assert_eq!(to_class_name("get_pet-by_id"), "GetPetById");
    assert_eq!(to_class_name("HTTP2"), "Http2");
    assert_eq!(to_class_name("__"), "__");
}
