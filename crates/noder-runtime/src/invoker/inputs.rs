use serde_json::Value;

use crate::definition::NodeKind;
use crate::invoker::extract_result;

/// Upstream outputs gathered for one node, bucketed by what they carry.
///
/// Text outputs feed prompts; image outputs feed image inputs. Video and
/// audio outputs have no downstream input role today and are dropped.
#[derive(Debug, Default, Clone)]
pub struct UpstreamInputs {
    /// Extracted text from upstream text nodes, in edge order.
    pub texts: Vec<String>,
    /// Image URLs or data URLs from upstream image nodes, in edge order.
    pub images: Vec<String>,
}

impl UpstreamInputs {
    /// Buckets raw upstream outputs by their producing node's kind.
    ///
    /// Outputs that fail extraction are skipped rather than failing the
    /// downstream node; the upstream node already surfaced its own result.
    pub fn collect<'a, I>(outputs: I) -> Self
    where
        I: IntoIterator<Item = (NodeKind, &'a Value)>,
    {
        let mut inputs = Self::default();
        for (kind, output) in outputs {
            let Ok(extracted) = extract_result(output, kind) else {
                continue;
            };
            let Value::String(text) = extracted else {
                continue;
            };
            match kind {
                NodeKind::Text => inputs.texts.push(text),
                NodeKind::Image => inputs.images.push(text),
                _ => {}
            }
        }
        inputs
    }

    /// Returns `true` when no upstream produced a usable input.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.images.is_empty()
    }

    /// Joins upstream texts into one prompt fragment.
    pub fn joined_text(&self) -> Option<String> {
        if self.texts.is_empty() {
            return None;
        }
        Some(self.texts.join("\n\n"))
    }
}
