use super::*;

#[test]
fn parse_keeps_attribute_order_children_and_text() {
    let root = XmlElement::parse(
        r#"<flame name="a" size="10 20"><xform weight="1"/><palette count="256">AB
CD</palette></flame>"#,
    )
    .unwrap();
    assert_eq!(root.name(), "flame");
    let attrs: Vec<_> = root.attributes().collect();
    assert_eq!(attrs, vec![("name", "a"), ("size", "10 20")]);
    assert_eq!(root.children().len(), 2);
    assert_eq!(root.children_named("xform").count(), 1);
    assert_eq!(root.descendants_named("palette")[0].text(), "AB\nCD");
}

#[test]
fn malformed_documents_are_format_errors() {
    let err = XmlElement::parse("<flame><xform></flame>").unwrap_err();
    assert!(err.is_format());
}

#[test]
fn descendants_are_preorder() {
    let root = XmlElement::parse("<a><b><c/></b><d/></a>").unwrap();
    let names: Vec<_> = root.descendants().iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["b", "c", "d"]);
}

#[test]
fn set_attr_replaces_in_place() {
    let mut e = XmlElement::new("xform").with_attr("a", "1").with_attr("b", "2");
    e.set_attr("a", "3");
    let attrs: Vec<_> = e.attributes().collect();
    assert_eq!(attrs, vec![("a", "3"), ("b", "2")]);
    assert_eq!(e.remove_attr("a").as_deref(), Some("3"));
    assert_eq!(e.attr("a"), None);
}

#[test]
fn writer_escapes_and_reparses() {
    let mut root = XmlElement::new("flame").with_attr("name", "a \"b\" & <c>");
    let mut pal = XmlElement::new("palette");
    pal.set_text("00FF00");
    root.push_child(XmlElement::new("xform").with_attr("weight", "0.5"));
    root.push_child(pal);

    let text = root.to_document_string();
    assert!(text.starts_with("<?xml"));
    let back = XmlElement::parse(&text).unwrap();
    assert_eq!(back.attr("name"), Some("a \"b\" & <c>"));
    assert_eq!(back.children()[0].attr("weight"), Some("0.5"));
    assert_eq!(back.children()[1].text(), "00FF00");
}

#[test]
fn case_insensitive_tag_check() {
    assert!(XmlElement::new("Flame").is_named("flame"));
    assert!(!XmlElement::new("flames").is_named("flame"));
}

#[test]
fn attribute_whitespace_survives_a_write_read_cycle() {
    let value = "tab\there\r\nand  spaces";
    let e = XmlElement::new("xform").with_attr("name", value);
    let back = XmlElement::parse(&e.to_document_string()).unwrap();
    assert_eq!(back.attr("name"), Some(value));
}
