//! XML helpers and the event-driven parser used by document handlers.

mod parser;
mod utils;

pub use parser::{XmlElement, XmlHandler, XmlParser};
pub use utils::{collect_ids, declared_xml_version, get_attribute, get_attribute_ns, get_tag_name};
