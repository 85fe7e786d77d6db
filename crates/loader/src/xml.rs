//! Streaming text extraction for XML documents.
//!
//! The extractor walks `quick-xml` events once and keeps a stack of open
//! elements. Stripped elements suppress every event below them, unwrapped
//! elements are transparent, and every other element is appended to the
//! element path that [`PathQuery`] is evaluated against. Each selected element
//! opens a capture that accumulates all descendant text. Captures are emitted
//! in start-tag order and joined with single spaces.
//!
//! Malformed input never fails: extraction stops at the first syntax error and
//! whatever was captured up to that point is returned.
use std::collections::HashSet;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

use crate::query::PathQuery;

#[derive(Debug)]
enum FrameKind {
    Kept { capture: Option<usize> },
    Unwrapped,
    Stripped,
}

#[derive(Debug)]
struct Frame {
    name: String,
    kind: FrameKind,
}

/// Compiled XML extraction rules.
#[derive(Debug, Clone)]
pub(crate) struct XmlExtractor {
    strip: HashSet<String>,
    unwrap: HashSet<String>,
    query: PathQuery,
}

impl XmlExtractor {
    pub(crate) fn new(strip_tags: &[String], unwrap_tags: &[String], query: PathQuery) -> Self {
        Self {
            strip: strip_tags.iter().map(|t| local_part(t).to_string()).collect(),
            unwrap: unwrap_tags.iter().map(|t| local_part(t).to_string()).collect(),
            query,
        }
    }

    /// Returns the concatenated text of every selected element.
    pub(crate) fn extract(&self, content: &[u8]) -> String {
        let mut state = State::default();
        let mut reader = Reader::from_reader(content);
        reader.config_mut().check_end_names = false;

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    self.open(&mut state, name);
                }
                Ok(Event::Empty(e)) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    self.open(&mut state, name.clone());
                    state.close(&name);
                }
                Ok(Event::End(e)) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    state.close(&name);
                }
                Ok(Event::Text(e)) => {
                    if state.capturing() {
                        let text = match e.unescape_with(resolve_entity) {
                            Ok(text) => text.into_owned(),
                            Err(_) => String::from_utf8_lossy(&e).into_owned(),
                        };
                        state.append(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if state.capturing() {
                        state.append(&String::from_utf8_lossy(&e));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => {
                    warn!(
                        error = %err,
                        position = reader.buffer_position(),
                        "xml_parse_error"
                    );
                    break;
                }
            }
            buf.clear();
        }

        state.finish()
    }

    fn open(&self, state: &mut State, name: String) {
        let kind = if state.skip_depth > 0 || self.strip.contains(&name) {
            state.skip_depth += 1;
            FrameKind::Stripped
        } else if self.unwrap.contains(&name) {
            FrameKind::Unwrapped
        } else {
            state.path.push(name.clone());
            let capture = if self.query.matches(&state.path) {
                let index = state.fragments.len();
                state.fragments.push(String::new());
                state.open_captures.push(index);
                Some(index)
            } else {
                None
            };
            FrameKind::Kept { capture }
        };
        state.frames.push(Frame { name, kind });
    }
}

#[derive(Debug, Default)]
struct State {
    frames: Vec<Frame>,
    path: Vec<String>,
    skip_depth: usize,
    open_captures: Vec<usize>,
    fragments: Vec<String>,
}

impl State {
    fn capturing(&self) -> bool {
        self.skip_depth == 0 && !self.open_captures.is_empty()
    }

    fn append(&mut self, text: &str) {
        for &index in &self.open_captures {
            self.fragments[index].push_str(text);
        }
    }

    /// Closes the innermost open element named `name` and everything opened
    /// after it. Stray end tags are ignored.
    fn close(&mut self, name: &str) {
        let Some(position) = self.frames.iter().rposition(|f| f.name == name) else {
            return;
        };
        while self.frames.len() > position {
            if let Some(frame) = self.frames.pop() {
                self.pop_frame(frame);
            }
        }
    }

    fn pop_frame(&mut self, frame: Frame) {
        match frame.kind {
            FrameKind::Stripped => self.skip_depth -= 1,
            FrameKind::Unwrapped => {}
            FrameKind::Kept { capture } => {
                self.path.pop();
                if capture.is_some() {
                    self.open_captures.pop();
                }
            }
        }
    }

    fn finish(mut self) -> String {
        while let Some(frame) = self.frames.pop() {
            self.pop_frame(frame);
        }
        self.fragments.join(" ")
    }
}

/// Predefined entities decode as usual. Any other named entity, such as a
/// DTD-defined `&nbsp;`, becomes a single space and the rest of the text node
/// still decodes.
fn resolve_entity(entity: &str) -> Option<&'static str> {
    Some(resolve_predefined_entity(entity).unwrap_or(" "))
}

fn local_part(tag: &str) -> &str {
    let tag = tag.trim();
    tag.rsplit(':').next().unwrap_or(tag)
}
