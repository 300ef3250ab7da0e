//! Render workflow template handling.
//!
//! The workflow is an opaque node graph; the client only touches three
//! inputs, addressed by configured node ids: the positive prompt, the
//! sampler seed, and the output file-name prefix.

use serde_json::Value;
use std::path::Path;
use storyloom_error::{ImageError, ImageErrorKind};

/// Load the workflow template from disk.
pub(crate) fn load_template(path: &Path) -> Result<Value, ImageError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ImageError::new(ImageErrorKind::Template(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;

    serde_json::from_str(&content)
        .map_err(|e| ImageError::new(ImageErrorKind::Template(e.to_string())))
}

/// Set one input field on one node, failing if the node or its `inputs`
/// object is absent from the template.
fn set_input(
    workflow: &mut Value,
    node: &str,
    field: &str,
    value: Value,
) -> Result<(), ImageError> {
    workflow
        .get_mut(node)
        .and_then(|n| n.get_mut("inputs"))
        .and_then(Value::as_object_mut)
        .map(|inputs| {
            inputs.insert(field.to_string(), value);
        })
        .ok_or_else(|| {
            ImageError::new(ImageErrorKind::Template(format!(
                "node {} has no inputs object",
                node
            )))
        })
}

/// Inject prompt, seed, and file-name prefix into the template.
pub(crate) fn prepare(
    mut workflow: Value,
    prompt_node: &str,
    seed_node: &str,
    filename_node: &str,
    prompt: &str,
    seed: u64,
    filename_prefix: &str,
) -> Result<Value, ImageError> {
    set_input(&mut workflow, prompt_node, "text", Value::from(prompt))?;
    set_input(&mut workflow, seed_node, "seed", Value::from(seed))?;
    set_input(
        &mut workflow,
        filename_node,
        "filename_prefix",
        Value::from(filename_prefix),
    )?;
    Ok(workflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template() -> Value {
        json!({
            "6": {"class_type": "CLIPTextEncode", "inputs": {"text": ""}},
            "9": {"class_type": "SaveImage", "inputs": {"filename_prefix": "out"}},
            "31": {"class_type": "KSampler", "inputs": {"seed": 0, "steps": 20}}
        })
    }

    #[test]
    fn test_prepare_sets_all_inputs() {
        let prepared = prepare(template(), "6", "31", "9", "a red fox", 42, "fox_20260807").unwrap();
        assert_eq!(prepared["6"]["inputs"]["text"], "a red fox");
        assert_eq!(prepared["31"]["inputs"]["seed"], 42);
        assert_eq!(prepared["9"]["inputs"]["filename_prefix"], "fox_20260807");
        // Untouched inputs survive.
        assert_eq!(prepared["31"]["inputs"]["steps"], 20);
    }

    #[test]
    fn test_prepare_missing_node_fails() {
        let workflow = json!({"6": {"inputs": {"text": ""}}});
        assert!(prepare(workflow, "6", "31", "9", "p", 1, "f").is_err());
    }
}
