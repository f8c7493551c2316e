//! Page assembly: combine documents and extract page selections
//!
//! Source documents are read-only; pages land in the output as deep clones of
//! the source object graph, never as live references into it. The output page
//! tree (`/Pages`, `/Kids`, `/Count`, `/Catalog`) is constructed explicitly
//! rather than inherited from any source.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, warn};

use crate::document::range::PageSelection;
use crate::error::AppError;

/// Combine two or more documents into one.
///
/// Pages appear as the full in-order page sequence of the first source,
/// followed by the second, and so on. Fewer than two sources is a validation
/// error, not a degenerate merge.
pub fn merge_documents(sources: &[Vec<u8>]) -> Result<Vec<u8>, AppError> {
    if sources.len() < 2 {
        return Err(AppError::Validation(format!(
            "combining requires at least 2 documents, got {}",
            sources.len()
        )));
    }

    let mut output = OutputDocument::new();

    for (index, bytes) in sources.iter().enumerate() {
        let doc = Document::load_mem(bytes).map_err(|e| {
            AppError::Processing(format!("failed to parse document #{}: {}", index + 1, e))
        })?;
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        output.import_pages(&doc, &page_ids)?;
    }

    debug!(
        sources = sources.len(),
        pages = output.page_count(),
        "Documents combined"
    );

    output.finish()
}

/// Extract the pages selected by `spec` into a new document.
///
/// Output page order follows the *selection* order, not ascending page
/// number: extracting `"3,1-2"` yields pages [3, 1, 2].
pub fn extract_pages(source: &[u8], spec: Option<&str>) -> Result<Vec<u8>, AppError> {
    let doc = Document::load_mem(source)
        .map_err(|e| AppError::Processing(format!("failed to parse document: {}", e)))?;

    let pages = doc.get_pages();
    let selection = PageSelection::resolve(spec, pages.len());

    let page_ids: Vec<ObjectId> = selection
        .iter()
        .filter_map(|index| pages.get(&(index as u32 + 1)).copied())
        .collect();

    let mut output = OutputDocument::new();
    output.import_pages(&doc, &page_ids)?;

    debug!(
        total = pages.len(),
        selected = output.page_count(),
        "Pages extracted"
    );

    output.finish()
}

/// Incrementally built output document.
///
/// Immutable once serialised by [`OutputDocument::finish`].
struct OutputDocument {
    doc: Document,
    pages: Vec<ObjectId>,
}

impl OutputDocument {
    fn new() -> Self {
        Self {
            doc: Document::with_version("1.5"),
            pages: Vec::new(),
        }
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append deep clones of the given source pages, in the given order.
    ///
    /// One imported-object map per source: clones referenced by more than one
    /// page (fonts, images) are copied once, and back-references into already
    /// imported objects (e.g. an annotation's `/P`) resolve to the copy
    /// instead of recursing forever.
    fn import_pages(&mut self, source: &Document, page_ids: &[ObjectId]) -> Result<(), AppError> {
        let mut imported: HashMap<ObjectId, ObjectId> = HashMap::new();

        for &page_id in page_ids {
            let page_object = source
                .get_object(page_id)
                .map_err(|e| AppError::Processing(format!("cannot read page object: {}", e)))?;

            let reserved = self.doc.new_object_id();
            imported.insert(page_id, reserved);
            let cloned = self.clone_value(source, page_object, &mut imported);
            self.doc.objects.insert(reserved, cloned);
            self.pages.push(reserved);
        }

        Ok(())
    }

    /// Build the page tree and catalog, then serialise.
    fn finish(mut self) -> Result<Vec<u8>, AppError> {
        let pages_id = self.doc.new_object_id();

        for &page_id in &self.pages {
            if let Ok(Object::Dictionary(dict)) = self.doc.get_object_mut(page_id) {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }

        let kids: Vec<Object> = self.pages.iter().map(|&id| Object::Reference(id)).collect();
        self.doc.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Count", Object::Integer(self.pages.len() as i64)),
                ("Kids", Object::Array(kids)),
            ])),
        );

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let mut out = Vec::new();
        self.doc
            .save_to(&mut out)
            .map_err(|e| AppError::Processing(format!("failed to serialise document: {}", e)))?;
        Ok(out)
    }

    fn clone_value(
        &mut self,
        source: &Document,
        object: &Object,
        imported: &mut HashMap<ObjectId, ObjectId>,
    ) -> Object {
        match object {
            Object::Dictionary(dict) => {
                Object::Dictionary(self.clone_dict(source, dict, imported))
            }
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.clone_value(source, item, imported))
                    .collect(),
            ),
            Object::Stream(stream) => Object::Stream(Stream::new(
                self.clone_dict(source, &stream.dict, imported),
                stream.content.clone(),
            )),
            Object::Reference(id) => {
                if let Some(&target) = imported.get(id) {
                    return Object::Reference(target);
                }
                match source.get_object(*id) {
                    Ok(referenced) => {
                        // Reserve the target id before descending so cycles
                        // terminate at the reservation.
                        let reserved = self.doc.new_object_id();
                        imported.insert(*id, reserved);
                        let cloned = self.clone_value(source, referenced, imported);
                        self.doc.objects.insert(reserved, cloned);
                        Object::Reference(reserved)
                    }
                    Err(e) => {
                        warn!(?id, %e, "Unresolvable reference in source document, using Null");
                        Object::Null
                    }
                }
            }
            other => other.clone(),
        }
    }

    /// Clone a dictionary's entries, dropping `/Parent`; the output page tree
    /// supplies its own parent links in [`OutputDocument::finish`].
    fn clone_dict(
        &mut self,
        source: &Document,
        dict: &Dictionary,
        imported: &mut HashMap<ObjectId, ObjectId>,
    ) -> Dictionary {
        let mut out = Dictionary::new();
        for (key, value) in dict.iter() {
            if key == b"Parent" {
                continue;
            }
            out.set(key.clone(), self.clone_value(source, value, imported));
        }
        out
    }
}
