//! Multi-flame documents: a bare `flame` root or a wrapper such as `flames`.

use super::flame::Flame;
use crate::{
    foundation::error::{FlameError, FlameResult},
    session::Session,
    xml::XmlElement,
};

/// Every flame in `doc`, in document order.
#[tracing::instrument(skip(session, doc), fields(bytes = doc.len()))]
pub fn read_flames(session: &Session, doc: &str) -> FlameResult<Vec<Flame>> {
    let root = XmlElement::parse(doc)?;
    if root.is_named("flame") {
        return Ok(vec![Flame::read_xml(session, &root)?]);
    }

    let flames = root
        .children()
        .iter()
        .filter(|c| c.is_named("flame"))
        .map(|c| Flame::read_xml(session, c))
        .collect::<FlameResult<Vec<_>>>()?;
    if flames.is_empty() {
        return Err(FlameError::format(format!(
            "no \"flame\" element found under \"{}\"",
            root.name()
        )));
    }
    tracing::debug!(count = flames.len(), "flames read");
    Ok(flames)
}

/// `<flames name=...>` document wrapping each flame.
pub fn write_flames<'a>(name: &str, flames: impl IntoIterator<Item = &'a Flame>) -> String {
    let mut root = XmlElement::new("flames").with_attr("name", name);
    for flame in flames {
        root.push_child(flame.write_xml());
    }
    root.to_document_string()
}

#[cfg(test)]
#[path = "../../tests/unit/model/batch.rs"]
mod tests;
