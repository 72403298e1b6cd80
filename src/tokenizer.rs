//! Adapter from quick-xml's pull events to open/close/text callbacks
//!
//! The tokenizer is the only component that looks at raw bytes. It guarantees
//! that the callbacks it emits are well nested: mismatched end tags and input
//! ending inside an open element are reported as stream errors instead of being
//! forwarded.

use std::io::{self, BufRead, Read};
use std::iter::Fuse;

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result, StreamError, StreamErrorCode};
use crate::router::Attributes;

/// Default buffer capacity for XML events (4KB)
const XML_BUFFER_CAPACITY: usize = 4096;

/// Receiver of tokenizer callbacks
///
/// Every method defaults to doing nothing. An error returned from any method
/// aborts tokenization and is passed back to the caller unchanged.
pub trait XmlHandler {
    /// An element was opened
    fn start_element(&mut self, _name: &str, _attributes: &Attributes<'_>) -> Result<()> {
        Ok(())
    }

    /// The innermost open element was closed
    fn end_element(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    /// A raw chunk of character data belonging to the innermost open element
    fn characters(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

/// `BufRead` wrapper counting the newlines the tokenizer has consumed
pub(crate) struct LineCounter<R> {
    inner: R,
    newlines: u64,
}

impl<R: BufRead> LineCounter<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner, newlines: 0 }
    }

    /// 1-based line of the next unconsumed byte
    pub(crate) fn line(&self) -> u64 {
        self.newlines + 1
    }
}

impl<R: BufRead> Read for LineCounter<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let n = {
            let available = self.fill_buf()?;
            let n = available.len().min(out.len());
            out[..n].copy_from_slice(&available[..n]);
            n
        };
        self.consume(n);
        Ok(n)
    }
}

impl<R: BufRead> BufRead for LineCounter<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        // The bytes being consumed are still buffered, so this never hits the source
        if let Ok(buffered) = self.inner.fill_buf() {
            let end = amt.min(buffered.len());
            self.newlines += memchr::memchr_iter(b'\n', &buffered[..end]).count() as u64;
        }
        self.inner.consume(amt);
    }
}

/// `Read` adapter over a sequence of byte chunks
///
/// Chunks are pulled lazily; the end of the iterator marks the final chunk.
///
/// # Example
///
/// ```
/// use collada_geometry::tokenizer::ChunkReader;
/// use std::io::Read;
///
/// let mut reader = ChunkReader::new(vec!["<a>", "</a>"]);
/// let mut out = String::new();
/// reader.read_to_string(&mut out).unwrap();
/// assert_eq!(out, "<a></a>");
/// ```
pub struct ChunkReader<I: Iterator> {
    chunks: Fuse<I>,
    current: Option<I::Item>,
    pos: usize,
}

impl<I, B> ChunkReader<I>
where
    I: Iterator<Item = B>,
    B: AsRef<[u8]>,
{
    /// Wrap anything that yields byte chunks
    pub fn new<T>(chunks: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            chunks: chunks.into_iter().fuse(),
            current: None,
            pos: 0,
        }
    }
}

impl<I, B> Read for ChunkReader<I>
where
    I: Iterator<Item = B>,
    B: AsRef<[u8]>,
{
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        loop {
            if let Some(chunk) = &self.current {
                let bytes = chunk.as_ref();
                if self.pos < bytes.len() {
                    let n = (bytes.len() - self.pos).min(out.len());
                    out[..n].copy_from_slice(&bytes[self.pos..self.pos + n]);
                    self.pos += n;
                    return Ok(n);
                }
            }
            match self.chunks.next() {
                Some(next) => {
                    self.current = Some(next);
                    self.pos = 0;
                }
                None => {
                    self.current = None;
                    return Ok(0);
                }
            }
        }
    }
}

fn classify(err: &quick_xml::Error) -> StreamErrorCode {
    match err {
        quick_xml::Error::Io(_) => StreamErrorCode::Io,
        quick_xml::Error::Syntax(_) => StreamErrorCode::Syntax,
        quick_xml::Error::IllFormed(_) => StreamErrorCode::IllFormed,
        quick_xml::Error::InvalidAttr(_) => StreamErrorCode::InvalidAttribute,
        quick_xml::Error::Encoding(_) => StreamErrorCode::Encoding,
        quick_xml::Error::Escape(_) => StreamErrorCode::Escape,
        _ => StreamErrorCode::Other,
    }
}

/// Build a stream error positioned at the reader's current location
fn stream_error<R: BufRead>(
    reader: &Reader<LineCounter<R>>,
    message: impl Into<String>,
    code: StreamErrorCode,
) -> Error {
    Error::Stream(StreamError::new(
        message,
        code,
        reader.get_ref().line(),
        reader.buffer_position() as u64,
    ))
}

fn read_error<R: BufRead>(reader: &Reader<LineCounter<R>>, err: quick_xml::Error) -> Error {
    Error::Stream(StreamError::new(
        err.to_string(),
        classify(&err),
        reader.get_ref().line(),
        reader.error_position() as u64,
    ))
}

fn decode_name<'a, R: BufRead>(reader: &Reader<LineCounter<R>>, raw: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(raw).map_err(|e| {
        stream_error(
            reader,
            format!("Element name is not valid UTF-8: {}", e),
            StreamErrorCode::Encoding,
        )
    })
}

/// Collect unescaped attributes of `start` into the scratch list
fn collect_attributes<R: BufRead>(
    reader: &Reader<LineCounter<R>>,
    start: &BytesStart<'_>,
    scratch: &mut Vec<(String, String)>,
) -> Result<()> {
    scratch.clear();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| {
            stream_error(
                reader,
                format!("Attribute parsing failed: {}", e),
                StreamErrorCode::InvalidAttribute,
            )
        })?;
        let key = decode_name(reader, attr.key.into_inner())?;
        let raw = std::str::from_utf8(&attr.value).map_err(|e| {
            stream_error(
                reader,
                format!("Attribute '{}' is not valid UTF-8: {}", key, e),
                StreamErrorCode::Encoding,
            )
        })?;
        let value = unescape(raw).map_err(|e| {
            stream_error(
                reader,
                format!("Attribute '{}': {}", key, e),
                StreamErrorCode::Escape,
            )
        })?;
        scratch.push((key.to_string(), value.into_owned()));
    }
    Ok(())
}

fn open_element<R: BufRead, H: XmlHandler + ?Sized>(
    reader: &Reader<LineCounter<R>>,
    start: &BytesStart<'_>,
    scratch: &mut Vec<(String, String)>,
    handler: &mut H,
) -> Result<()> {
    let name = decode_name(reader, start.name().into_inner())?;
    collect_attributes(reader, start, scratch)?;
    handler.start_element(name, &Attributes::new(scratch))
}

/// Drive `handler` with the events of the XML document read from `source`
///
/// Text is forwarded exactly as the tokenizer produced it: no trimming and no
/// coalescing. Entity references arrive as their own resolved chunk.
pub fn tokenize<R, H>(source: R, handler: &mut H) -> Result<()>
where
    R: BufRead,
    H: XmlHandler + ?Sized,
{
    let mut reader = Reader::from_reader(LineCounter::new(source));
    let mut buf = Vec::with_capacity(XML_BUFFER_CAPACITY);
    let mut attributes: Vec<(String, String)> = Vec::with_capacity(8);
    let mut depth: usize = 0;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| read_error(&reader, e))?;

        match event {
            Event::Start(ref e) => {
                open_element(&reader, e, &mut attributes, handler)?;
                depth += 1;
            }
            Event::Empty(ref e) => {
                open_element(&reader, e, &mut attributes, handler)?;
                let name = decode_name(&reader, e.name().into_inner())?;
                handler.end_element(name)?;
            }
            Event::End(ref e) => {
                let name = decode_name(&reader, e.name().into_inner())?;
                handler.end_element(name)?;
                depth = depth.saturating_sub(1);
            }
            Event::Text(ref t) => {
                let text = t.decode().map_err(|e| {
                    stream_error(&reader, e.to_string(), StreamErrorCode::Encoding)
                })?;
                if !text.is_empty() {
                    handler.characters(&text)?;
                }
            }
            Event::CData(ref c) => {
                let text = c.decode().map_err(|e| {
                    stream_error(&reader, e.to_string(), StreamErrorCode::Encoding)
                })?;
                if !text.is_empty() {
                    handler.characters(&text)?;
                }
            }
            Event::GeneralRef(ref r) => {
                match r.resolve_char_ref().map_err(|e| read_error(&reader, e))? {
                    Some(ch) => {
                        let mut utf8 = [0u8; 4];
                        handler.characters(ch.encode_utf8(&mut utf8))?;
                    }
                    None => {
                        let entity = r.decode().map_err(|e| {
                            stream_error(&reader, e.to_string(), StreamErrorCode::Encoding)
                        })?;
                        let resolved = resolve_predefined_entity(&entity).ok_or_else(|| {
                            stream_error(
                                &reader,
                                format!("Undefined entity '&{};'", entity),
                                StreamErrorCode::Escape,
                            )
                        })?;
                        handler.characters(resolved)?;
                    }
                }
            }
            Event::Eof => {
                if depth > 0 {
                    return Err(Error::unexpected_eof(
                        depth,
                        reader.get_ref().line(),
                        reader.buffer_position() as u64,
                    ));
                }
                break;
            }
            // Declarations, comments, processing instructions and DOCTYPE carry no geometry
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl XmlHandler for Recorder {
        fn start_element(&mut self, name: &str, attributes: &Attributes<'_>) -> Result<()> {
            let attrs: Vec<String> = attributes
                .iter()
                .map(|a| format!("{}={}", a.name, a.value))
                .collect();
            self.events.push(format!("open {} [{}]", name, attrs.join(",")));
            Ok(())
        }

        fn end_element(&mut self, name: &str) -> Result<()> {
            self.events.push(format!("close {}", name));
            Ok(())
        }

        fn characters(&mut self, text: &str) -> Result<()> {
            self.events.push(format!("text {:?}", text));
            Ok(())
        }
    }

    fn record(xml: &str) -> Result<Vec<String>> {
        let mut recorder = Recorder::default();
        tokenize(xml.as_bytes(), &mut recorder)?;
        Ok(recorder.events)
    }

    #[test]
    fn test_events_are_well_nested() {
        let events = record(r#"<a x="1"><b/><c>hi</c></a>"#).unwrap();
        assert_eq!(
            events,
            vec![
                "open a [x=1]",
                "open b []",
                "close b",
                "open c []",
                "text \"hi\"",
                "close c",
                "close a",
            ]
        );
    }

    #[test]
    fn test_text_is_not_trimmed() {
        let events = record("<a> 1 2 </a>").unwrap();
        assert_eq!(events[1], "text \" 1 2 \"");
    }

    #[test]
    fn test_entities_arrive_as_separate_chunks() {
        let events = record("<a>x&amp;y&#65;</a>").unwrap();
        let text: String = events
            .iter()
            .filter_map(|e| e.strip_prefix("text "))
            .map(|t| t.trim_matches('"').to_string())
            .collect();
        assert_eq!(text, "x&yA");
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let events = record(r#"<a name="x &lt; y"/>"#).unwrap();
        assert_eq!(events[0], "open a [name=x < y]");
    }

    #[test]
    fn test_cdata_is_text() {
        let events = record("<a><![CDATA[1 2 3]]></a>").unwrap();
        assert_eq!(events[1], "text \"1 2 3\"");
    }

    #[test]
    fn test_comments_and_declaration_are_ignored() {
        let events = record("<?xml version=\"1.0\"?><!-- note --><a/>").unwrap();
        assert_eq!(events, vec!["open a []", "close a"]);
    }

    #[test]
    fn test_mismatched_end_tag_is_stream_error() {
        let err = record("<a>\n<b>\n</c>\n</a>").unwrap_err();
        let stream = err.as_stream_error().unwrap();
        assert_eq!(stream.code, StreamErrorCode::IllFormed);
        assert_eq!(stream.line, 3);
    }

    #[test]
    fn test_unclosed_element_is_stream_error() {
        let err = record("<a><b></b>").unwrap_err();
        let stream = err.as_stream_error().unwrap();
        assert!(matches!(
            stream.code,
            StreamErrorCode::UnexpectedEof | StreamErrorCode::IllFormed
        ));
    }

    #[test]
    fn test_undefined_entity_is_stream_error() {
        let err = record("<a>&bogus;</a>").unwrap_err();
        assert!(err.is_stream_error());
    }

    #[test]
    fn test_handler_error_is_returned_unchanged() {
        struct Reject;
        impl XmlHandler for Reject {
            fn start_element(&mut self, _: &str, _: &Attributes<'_>) -> Result<()> {
                Err(Error::InvalidVersion("x".to_string()))
            }
        }
        let err = tokenize("<a/>".as_bytes(), &mut Reject).unwrap_err();
        assert!(matches!(err, Error::InvalidVersion(ref v) if v == "x"));
    }

    #[test]
    fn test_chunk_reader_concatenates() {
        let mut reader = ChunkReader::new(vec![b"ab".to_vec(), Vec::new(), b"cde".to_vec()]);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"abcde");
        let mut tail = [0u8; 4];
        assert_eq!(reader.read(&mut tail).unwrap(), 0);
    }

    #[test]
    fn test_line_counter_tracks_consumed_newlines() {
        let mut counter = LineCounter::new("a\nb\nc".as_bytes());
        assert_eq!(counter.line(), 1);
        let mut two = [0u8; 2];
        counter.read_exact(&mut two).unwrap();
        assert_eq!(counter.line(), 2);
        let mut rest = Vec::new();
        counter.read_to_end(&mut rest).unwrap();
        assert_eq!(counter.line(), 3);
    }
}
