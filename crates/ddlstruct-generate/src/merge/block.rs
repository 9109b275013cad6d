//! Location of a generated struct block inside existing text.

use regex::Regex;

use super::MergeError;
use crate::tags::METADATA_FIELD_NAME;

/// Where the new block ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Replaced,
    Appended,
}

/// Pattern spanning a generated block: the struct header for `type_name`,
/// every line up to the metadata field and the closing brace, then the
/// optional constants block separated only by blank or comment lines.
pub fn block_pattern(type_name: &str) -> Result<Regex, regex::Error> {
    let name = regex::escape(type_name);
    Regex::new(&format!(
        concat!(
            r"(?m)^type[ \t]+{name}[ \t]+struct[ \t]*\{{[^\n]*\n",
            r"(?:(?:[^}}\n][^\n]*)?\n)*?",
            r"[ \t]*{metadata}[ \t][^\n]*\n\}}[ \t\r]*",
            r"(?:\n(?:[ \t]*(?://[^\n]*)?\r?\n)*?[ \t]*const[ \t]*\([^\n]*\n",
            r"(?:(?:[^)\n][^\n]*)?\n)*?\)[ \t\r]*)?",
            r"(?:\n|\z)",
        ),
        name = name,
        metadata = METADATA_FIELD_NAME,
    ))
}

fn header_pattern(type_name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?m)^type[ \t]+{}[ \t]+struct\b",
        regex::escape(type_name)
    ))
}

/// Replace the block of `type_name` in `text` or append `block` at the end.
///
/// A struct header that exists without a recognizable block is an error so
/// that hand-edited declarations are never duplicated.
pub fn splice_block(
    text: &str,
    type_name: &str,
    block: &str,
) -> Result<(String, Placement), MergeError> {
    if let Some(found) = block_pattern(type_name)?.find(text) {
        let mut merged = String::with_capacity(text.len() + block.len());
        merged.push_str(&text[..found.start()]);
        merged.push_str(block);
        merged.push_str(&text[found.end()..]);
        return Ok((merged, Placement::Replaced));
    }

    if header_pattern(type_name)?.is_match(text) {
        return Err(MergeError::UnmatchedDeclaration {
            type_name: type_name.to_string(),
        });
    }

    let mut merged = String::with_capacity(text.len() + block.len() + 2);
    merged.push_str(text);
    if !merged.ends_with('\n') {
        merged.push('\n');
    }
    merged.push('\n');
    merged.push_str(block);
    Ok((merged, Placement::Appended))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = "type SomeRandomTab struct {\n\tDbMetadata_ any `json:\"-\"`\n}\n// SomeRandomTab\nconst (\n\tSomeRandomTab_Id string = \"Id|t.id\"\n)\n";

    #[test]
    fn replaces_block_with_constants() {
        let text = concat!(
            "package olaf\n\n",
            "type SomeRandomTab struct {\n",
            "\t// Existing content\n",
            "\tDbMetadata_ any\n",
            "}\n",
            "// SomeRandomTab\n",
            "const (\n",
            "\tSomeRandomTab_Col1 string  = \"\"\n",
            "\tSomeRandomTab_Col2 string = \"\"\n",
            ")\n",
            "\n",
            "type ItsHere struct {\n",
            "\tDbMetadata_ any\n",
            "}\n",
        );

        let (merged, placement) = splice_block(text, "SomeRandomTab", BLOCK).expect("merged");

        assert_eq!(placement, Placement::Replaced);
        assert_eq!(
            merged,
            format!("package olaf\n\n{BLOCK}\ntype ItsHere struct {{\n\tDbMetadata_ any\n}}\n")
        );
    }

    #[test]
    fn replaces_block_without_constants_at_end_of_file() {
        let text = "package olaf\n\ntype SomeRandomTab struct {\n\tDbMetadata_ any\n}";
        let (merged, placement) = splice_block(text, "SomeRandomTab", BLOCK).expect("merged");

        assert_eq!(placement, Placement::Replaced);
        assert_eq!(merged, format!("package olaf\n\n{BLOCK}"));
    }

    #[test]
    fn does_not_match_prefixed_type_names() {
        let text = "package olaf\n\ntype SomeRandomTabX struct {\n\tDbMetadata_ any\n}\n";
        let (merged, placement) = splice_block(text, "SomeRandomTab", BLOCK).expect("merged");

        assert_eq!(placement, Placement::Appended);
        assert_eq!(merged, format!("{text}\n{BLOCK}"));
    }

    #[test]
    fn appends_after_missing_trailing_newline() {
        let text = "package olaf\n\ntype SomeRandom struct {\n\tDbMetadata_ any\n}";
        let (merged, _) = splice_block(text, "Other", ">>>NewContent<<<").expect("merged");

        assert_eq!(merged, format!("{text}\n\n>>>NewContent<<<"));
    }

    #[test]
    fn hand_written_struct_with_same_name_is_rejected() {
        let text = "package olaf\n\ntype SomeRandomTab struct {\n\tName string\n}\n";
        let err = splice_block(text, "SomeRandomTab", BLOCK).unwrap_err();

        assert_eq!(
            err,
            MergeError::UnmatchedDeclaration {
                type_name: "SomeRandomTab".to_string(),
            }
        );
    }

    #[test]
    fn unrelated_const_block_is_not_swallowed() {
        let text = concat!(
            "type SomeRandomTab struct {\n",
            "\tDbMetadata_ any\n",
            "}\n",
            "\n",
            "func Hello() {}\n",
            "const (\n",
            "\tX = 1\n",
            ")\n",
        );
        let (merged, _) = splice_block(text, "SomeRandomTab", BLOCK).expect("merged");

        assert_eq!(
            merged,
            format!("{BLOCK}\nfunc Hello() {{}}\nconst (\n\tX = 1\n)\n")
        );
    }
}
