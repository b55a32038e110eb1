use std::collections::HashMap;
use std::io;
use std::io::ErrorKind;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use spdlog::debug;

use crate::content::{PostId, PostMeta, PostRecord};
use crate::text_utils::parse_post_date;

const FENCE: &str = "---";

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

/// Example of post
/// ---
/// title: "Get-ADObject with PSCX MemberOf"
/// date: 2017-06-30
/// tags: [powershell, active-directory]
/// ---
///
/// Post body, in markdown
pub fn parse_post(id: PostId, collection: &str, raw_content: &str, file_name: &Path) -> io::Result<PostRecord> {
    let Some((front, body)) = split_front_matter(raw_content) else {
        return Err(invalid_data("Front matter is missing", file_name));
    };

    let fields = parse_fields(front, file_name)?;
    let data = post_meta_from_fields(&fields, file_name)?;

    Ok(PostRecord {
        id,
        collection: collection.to_string(),
        body: body.to_string(),
        data,
    })
}

/// Splits `---` fenced front matter from the body. The opening fence has to be the first line.
pub fn split_front_matter(raw_content: &str) -> Option<(&str, &str)> {
    let raw_content = raw_content.strip_prefix('\u{feff}').unwrap_or(raw_content);
    let mut lines = raw_content.split_inclusive('\n');

    let first = lines.next()?;
    if first.trim_end() != FENCE {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == FENCE {
            let front = &raw_content[start..offset];
            let body = &raw_content[offset + line.len()..];
            return Some((front, body));
        }
        offset += line.len();
    }

    None
}

pub fn parse_fields(front: &str, file_name: &Path) -> io::Result<HashMap<String, FieldValue>> {
    let mut fields: HashMap<String, FieldValue> = HashMap::new();
    let mut last_key: Option<String> = None;
    // Set while the last key had no inline value, so indented lines may belong to it
    let mut open_key: Option<String> = None;

    for line in front.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Block list item, belongs to the previous key
        if let Some(item) = trimmed.strip_prefix("- ") {
            let Some(ref key) = last_key else {
                return Err(invalid_data(&format!("List item without key: {}", trimmed), file_name));
            };
            let item = parse_scalar(strip_comment(item), key, file_name)?;
            let entry = fields.entry(key.clone()).or_insert_with(|| FieldValue::List(vec![]));
            if matches!(entry, FieldValue::Scalar(s) if s.is_empty()) {
                *entry = FieldValue::List(vec![]);
            }
            match entry {
                FieldValue::List(items) => items.push(item),
                FieldValue::Scalar(_) => {
                    return Err(invalid_data(&format!("Key {} mixes a value and a list", key), file_name));
                }
            }
            continue;
        }

        let Some((key, value)) = extract_key_val(line) else {
            match open_key {
                // Nested values are not used by any known key
                Some(ref key) if line.starts_with(char::is_whitespace) => {
                    debug!("Skipping nested line [{}] of {} - file={}", line, key, file_name.display());
                    continue;
                }
                _ => return Err(invalid_data(&format!("Unsupported front matter line: {}", trimmed), file_name)),
            }
        };

        let field = parse_value(key, value, file_name)?;
        open_key = match field {
            FieldValue::Scalar(ref s) if s.is_empty() => Some(key.to_string()),
            _ => None,
        };
        fields.insert(key.to_string(), field);
        last_key = Some(key.to_string());
    }

    Ok(fields)
}

fn parse_value(key: &str, raw_value: &str, file_name: &Path) -> io::Result<FieldValue> {
    let value = strip_comment(raw_value);

    if let Some(list) = value.strip_prefix('[') {
        let Some(list) = list.strip_suffix(']') else {
            return Err(invalid_data(&format!("Unterminated list for key {}", key), file_name));
        };
        return Ok(FieldValue::List(extract_list(list, key, file_name)?));
    }

    if value.starts_with('{') {
        return Err(invalid_data(&format!("Inline mappings are not supported for key {}", key), file_name));
    }

    if is_block_scalar(value) {
        return Err(invalid_data(&format!("Block scalars are not supported for key {}", key), file_name));
    }

    Ok(FieldValue::Scalar(parse_scalar(value, key, file_name)?))
}

/// `>`, `|` and their chomping/indentation variants, e.g. `>-` or `|2+`
fn is_block_scalar(value: &str) -> bool {
    match value.strip_prefix('>').or_else(|| value.strip_prefix('|')) {
        Some(rest) => rest.chars().all(|c| c == '-' || c == '+' || c.is_ascii_digit()),
        None => false,
    }
}

/// Drops a trailing ` # comment`. A `#` inside a leading quoted string is kept.
fn strip_comment(value: &str) -> &str {
    let value = value.trim();
    let start = match value.chars().next() {
        Some(quote @ ('"' | '\'')) => value[1..].find(quote).map(|pos| pos + 2).unwrap_or(value.len()),
        _ => 0,
    };

    for (pos, c) in value[start..].char_indices() {
        let pos = start + pos;
        if c == '#' && (pos == 0 || value[..pos].ends_with(char::is_whitespace)) {
            return value[..pos].trim_end();
        }
    }
    value
}

fn parse_scalar(value: &str, key: &str, file_name: &Path) -> io::Result<String> {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.starts_with(quote) {
            if value.len() < 2 || !value.ends_with(quote) {
                return Err(invalid_data(&format!("Unterminated quote in value of key {}", key), file_name));
            }
            return Ok(value[1..value.len() - 1].to_string());
        }
    }
    Ok(value.to_string())
}

fn post_meta_from_fields(fields: &HashMap<String, FieldValue>, file_name: &Path) -> io::Result<PostMeta> {
    let title = match scalar(fields, "title", file_name)? {
        Some(title) => title.to_string(),
        None => return Err(invalid_data("Title is required", file_name)),
    };

    let date = match scalar(fields, "date", file_name)? {
        Some(date) => to_date(date, file_name)?,
        None => return Err(invalid_data("Date is required", file_name)),
    };

    let updated_date = match scalar(fields, "updatedDate", file_name)? {
        Some(date) => Some(to_date(date, file_name)?),
        None => None,
    };

    let draft = match scalar(fields, "draft", file_name)? {
        None => false,
        Some("true") => true,
        Some("false") => false,
        Some(other) => return Err(invalid_data(&format!("Draft must be true or false, got {}", other), file_name)),
    };

    let tags = match fields.get("tags") {
        None => vec![],
        Some(FieldValue::List(tags)) => tags.clone(),
        Some(FieldValue::Scalar(tags)) if tags.is_empty() => vec![],
        Some(FieldValue::Scalar(_)) => return Err(invalid_data("Tags must be a list", file_name)),
    };

    let optional = |key: &str| -> io::Result<Option<String>> {
        Ok(scalar(fields, key, file_name)?.map(|s| s.to_string()))
    };

    Ok(PostMeta {
        title,
        date,
        updated_date,
        description: optional("description")?,
        tags,
        categories: optional("categories")?,
        hero_image: optional("heroImage")?,
        draft,
    })
}

fn scalar<'a>(fields: &'a HashMap<String, FieldValue>, key: &str, file_name: &Path) -> io::Result<Option<&'a str>> {
    match fields.get(key) {
        None => Ok(None),
        Some(FieldValue::Scalar(s)) if s.is_empty() => Ok(None),
        Some(FieldValue::Scalar(s)) => Ok(Some(s.as_str())),
        Some(FieldValue::List(_)) => Err(invalid_data(&format!("Key {} must not be a list", key), file_name)),
    }
}

fn to_date(value: &str, file_name: &Path) -> io::Result<chrono::DateTime<chrono::Utc>> {
    parse_post_date(value).map_err(|e| invalid_data(&e, file_name))
}

fn extract_key_val(line: &str) -> Option<(&str, &str)> {
    lazy_static! {
        static ref KEY_VAL_REGEX: Regex = Regex::new(r"^(?P<key>[A-Za-z_][A-Za-z0-9_]*):(?P<value>.*)$").unwrap();
    }

    KEY_VAL_REGEX.captures(line).and_then(|cap| {
        let key = cap.name("key").map(|key| key.as_str());
        let val = cap.name("value").map(|val| val.as_str());
        match (key, val) {
            (Some(key), Some(val)) => Some((key, val)),
            _ => None
        }
    })
}

fn extract_list(list_str: &str, key: &str, file_name: &Path) -> io::Result<Vec<String>> {
    let mut items = vec![];
    for item in list_str.split(',') {
        let item = parse_scalar(item, key, file_name)?;
        if !item.is_empty() {
            items.push(item);
        }
    }
    Ok(items)
}

fn invalid_data(desc: &str, file_name: &Path) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, format!("{} - file={}", desc, file_name.display()))
}
