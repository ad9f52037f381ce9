use anyhow::Result;
use confmap::Retrieved;

/// Output encoding for retrieved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Yaml,
    Json,
}

/// Render retrieved documents in URI order.
///
/// A single document is printed bare. Several YAML documents are separated
/// by `---` and headed by their URI; several JSON documents become an array
/// of `{ "uri", "config" }` objects.
pub fn render(documents: &[(&str, Retrieved)], format: Format) -> Result<String> {
    match format {
        Format::Yaml => render_yaml(documents),
        Format::Json => render_json(documents),
    }
}

fn render_yaml(documents: &[(&str, Retrieved)]) -> Result<String> {
    if let [(_, only)] = documents {
        return Ok(serde_yaml_ng::to_string(only.value())?);
    }

    let mut out = String::new();
    for (i, (uri, retrieved)) in documents.iter().enumerate() {
        if i > 0 {
            out.push_str("---\n");
        }
        out.push_str(&format!("# {uri}\n"));
        out.push_str(&serde_yaml_ng::to_string(retrieved.value())?);
    }
    Ok(out)
}

fn render_json(documents: &[(&str, Retrieved)]) -> Result<String> {
    let value = if let [(_, only)] = documents {
        only.to_json()
    } else {
        serde_json::Value::Array(
            documents
                .iter()
                .map(|(uri, retrieved)| {
                    serde_json::json!({
                        "uri": uri,
                        "config": retrieved.to_json(),
                    })
                })
                .collect(),
        )
    };
    let mut rendered = serde_json::to_string_pretty(&value)?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(yaml: &str) -> Retrieved {
        Retrieved::from_yaml(yaml.as_bytes()).unwrap()
    }

    #[test]
    fn single_yaml_document_is_bare() {
        let out = render(&[("http://a/c", doc("a: 1"))], Format::Yaml).unwrap();
        assert_eq!(out, "a: 1\n");
    }

    #[test]
    fn multiple_yaml_documents_are_separated() {
        let out = render(
            &[("http://a/c", doc("a: 1")), ("s3://b", doc("b: 2"))],
            Format::Yaml,
        )
        .unwrap();
        assert_eq!(out, "# http://a/c\na: 1\n---\n# s3://b\nb: 2\n");
    }

    #[test]
    fn single_json_document_is_bare() {
        let out = render(&[("http://a/c", doc("a: 1"))], Format::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["a"], 1);
    }

    #[test]
    fn multiple_json_documents_keep_uris() {
        let out = render(
            &[("http://a/c", doc("a: 1")), ("s3://b", doc("b: 2"))],
            Format::Json,
        )
        .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["uri"], "http://a/c");
        assert_eq!(parsed[1]["config"]["b"], 2);
    }
}
