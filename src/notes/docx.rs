//! Paragraph extraction from `.docx` files.
//!
//! A docx is a zip archive holding `word/document.xml`; the text lives in
//! `<w:t>` runs grouped under `<w:p>` paragraph elements. Paragraph order is
//! document order, which is what the task extraction relies on.

use std::io::BufReader;
use std::path::Path;

use quick_xml::events::Event;

/// Extract the text of each paragraph, in document order.
///
/// Empty paragraphs are preserved here (the caller decides what to skip) and
/// any structural problem becomes a descriptive error string.
pub fn extract_paragraphs(path: &Path) -> Result<Vec<String>, String> {
    let file = std::fs::File::open(path)
        .map_err(|e| format!("could not open {}: {}", path.display(), e))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| format!("not a valid .docx archive: {}", e))?;
    let doc = archive
        .by_name("word/document.xml")
        .map_err(|e| format!("missing word/document.xml: {}", e))?;

    let mut reader = quick_xml::Reader::from_reader(BufReader::new(doc));
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;
    let mut in_paragraph = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = true,
                b"p" => {
                    in_paragraph = true;
                    current.clear();
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    if in_paragraph {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                    in_paragraph = false;
                }
                _ => {}
            },
            // Word writes empty paragraphs as self-closing <w:p/>
            Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"p" {
                    paragraphs.push(String::new());
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_text_run {
                    let text = e
                        .unescape()
                        .map_err(|e| format!("bad XML text content: {}", e))?;
                    current.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("malformed document XML: {}", e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_docx(dir: &Path, name: &str, body_xml: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let file = std::fs::File::create(&path).unwrap();
        let mut archive = zip::ZipWriter::new(file);
        archive
            .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        let document = format!(
            "<?xml version=\"1.0\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{}</w:body></w:document>",
            body_xml
        );
        archive.write_all(document.as_bytes()).unwrap();
        archive.finish().unwrap();
        path
    }

    #[test]
    fn paragraphs_come_out_in_document_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(
            dir.path(),
            "export.docx",
            "<w:p><w:r><w:t>First task</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Second </w:t></w:r><w:r><w:t>task</w:t></w:r></w:p>\
             <w:p></w:p>",
        );

        let paragraphs = extract_paragraphs(&path).unwrap();
        assert_eq!(paragraphs, vec!["First task", "Second task", ""]);
    }

    #[test]
    fn self_closing_paragraphs_keep_their_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(
            dir.path(),
            "export.docx",
            "<w:p><w:r><w:t>Before</w:t></w:r></w:p>\
             <w:p/>\
             <w:p><w:r><w:t>After</w:t></w:r></w:p>",
        );

        let paragraphs = extract_paragraphs(&path).unwrap();
        assert_eq!(paragraphs, vec!["Before", "", "After"]);
    }

    #[test]
    fn corrupt_archive_is_a_descriptive_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"this is not a zip").unwrap();

        let err = extract_paragraphs(&path).unwrap_err();
        assert!(err.contains("not a valid .docx archive"), "got: {}", err);
    }

    #[test]
    fn missing_document_xml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.docx");
        let file = std::fs::File::create(&path).unwrap();
        let mut archive = zip::ZipWriter::new(file);
        archive
            .start_file("other.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        archive.write_all(b"nothing").unwrap();
        archive.finish().unwrap();

        let err = extract_paragraphs(&path).unwrap_err();
        assert!(err.contains("word/document.xml"), "got: {}", err);
    }
}
