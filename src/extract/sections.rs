//! Free-text sections and timeframe dates.
//!
//! These are not part of the default record but stay callable on their own.

use super::clean;
use crate::models::{Section, Timeframe};
use crate::sources::SourceError;
use crate::utils::{Child, Document, Element, Query};

/// Accordion panels that hold contact or funding boilerplate rather than prose
pub const IGNORED_SECTIONS: [&str; 4] = ["Funding", "Contacts", "Timeframe", "Learn More"];

/// Group `children` into sections, each `h2` starting a new one.
///
/// Content before the first heading is filed under `default_name`. Sections
/// whose text is blank are dropped.
pub fn split_sections<'a, I>(default_name: &str, children: I) -> Vec<Section>
where
    I: IntoIterator<Item = Child<'a>>,
{
    let mut sections = Vec::new();
    let mut name = default_name.to_string();
    let mut text = String::new();

    for child in children {
        match child {
            Child::Element(heading) if heading.name() == "h2" => {
                let finished = std::mem::replace(&mut name, heading.text());
                push_section(&mut sections, finished, std::mem::take(&mut text));
            }
            other => text.push_str(&other.text()),
        }
    }
    push_section(&mut sections, name, text);

    sections
}

fn push_section(sections: &mut Vec<Section>, name: String, text: String) {
    if !text.trim().is_empty() {
        sections.push(Section { name, text });
    }
}

/// The overview followed by every accordion panel not named in `ignored`
pub fn extract_sections(
    url: &str,
    doc: &Document,
    ignored: &[&str],
) -> Result<Vec<Section>, SourceError> {
    let mut sections = Vec::new();

    if let Some(overview) = overview_section(doc) {
        sections.push(overview);
    }

    for button in doc.find_all(&Query::tag("button").class("accordion")) {
        let name = button.string().unwrap_or_else(|| clean(button.text()));
        if ignored.contains(&name.as_str()) {
            continue;
        }

        let panel = button
            .find_next_sibling(&Query::tag("div").class("panel"))
            .ok_or_else(|| SourceError::Structure {
                url: url.to_string(),
                field: "section",
                missing: "panel",
            })?;
        sections.extend(split_sections(&name, panel.children()));
    }

    Ok(sections)
}

fn overview_section(doc: &Document) -> Option<Section> {
    let region = doc.find(&Query::tag("div").class("overview"))?;
    let heading = region.find(&Query::tag("h2").string("Overview"))?;
    let following = heading.next_element_siblings();
    if following.is_empty() {
        return None;
    }

    let text: String = following.iter().map(Element::text).collect();
    Some(Section::new("Overview", text))
}

/// Start and end dates listed after the "Timeframe" button
pub fn extract_timeframe(doc: &Document) -> Timeframe {
    let Some(button) = doc.find(&Query::tag("button").string("Timeframe")) else {
        return Timeframe::default();
    };

    Timeframe {
        start_date: dated_attribute(&button, "Start Date:"),
        end_date: dated_attribute(&button, "End Date:"),
    }
}

fn dated_attribute(anchor: &Element<'_>, label: &str) -> Option<String> {
    let paragraph = anchor.find_next(|e| is_single_attribute(e, label))?;
    let text = clean(paragraph.text());
    let value = text.strip_prefix(label).unwrap_or(&text).trim();
    Some(value.to_string())
}

fn is_single_attribute(element: &Element<'_>, label: &str) -> bool {
    element.name() == "p"
        && element
            .attr("class")
            .is_some_and(|class| class.split_whitespace().eq(["singleattr"]))
        && element
            .find_all(&Query::tag("strong"), true)
            .iter()
            .any(|strong| strong.string().is_some_and(|s| s.contains(label)))
}
