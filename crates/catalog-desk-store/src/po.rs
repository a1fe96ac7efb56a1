use catalog_desk_core::MessageEntry;
use thiserror::Error;

const FUZZY_FLAG: &str = "fuzzy";
const REFERENCE_WIDTH: usize = 76;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct PoParseError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoHeader {
    pub translator_comments: Vec<String>,
    pub flags: Vec<String>,
    pub metadata: Vec<(String, String)>,
}

impl PoHeader {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.metadata.iter_mut().find(|(name, _)| name == key) {
            Some((_, existing)) => *existing = value,
            None => self.metadata.push((key.to_string(), value)),
        }
    }

    fn msgstr(&self) -> String {
        self.metadata
            .iter()
            .map(|(key, value)| format!("{key}: {value}\n"))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoExtras {
    pub translator_comments: Vec<String>,
    pub extracted_comments: Vec<String>,
    pub flags: Vec<String>,
    pub previous: Vec<String>,
    pub msgid_plural: Option<String>,
    pub msgstr_plural: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoDocument {
    pub header: Option<PoHeader>,
    pub entries: Vec<MessageEntry>,
    pub extras: Vec<PoExtras>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Context,
    Id,
    IdPlural,
    Str,
    StrIndex(usize),
}

#[derive(Debug, Default)]
struct Pending {
    extras: PoExtras,
    fuzzy: bool,
    occurrences: Vec<String>,
    obsolete: bool,
    context: Option<String>,
    msgid: Option<String>,
    msgstr: Option<String>,
    field: Option<Field>,
}

impl Pending {
    fn has_message(&self) -> bool {
        self.msgid.is_some()
    }

    fn has_translation(&self) -> bool {
        self.msgstr.is_some() || !self.extras.msgstr_plural.is_empty()
    }
}

pub fn parse_po(input: &str) -> Result<PoDocument, PoParseError> {
    let mut document = PoDocument::default();
    let mut pending = Pending::default();

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim_end();

        if line.trim().is_empty() {
            flush(&mut document, &mut pending, line_no)?;
            continue;
        }

        if let Some(rest) = line.strip_prefix("#~") {
            let rest = rest.trim_start();
            if rest.starts_with('|') {
                continue;
            }
            if pending.has_message() && starts_entry(rest) {
                flush(&mut document, &mut pending, line_no)?;
            }
            pending.obsolete = true;
            parse_keyword_line(&mut document, &mut pending, rest, line_no)?;
            continue;
        }

        if let Some(rest) = line.strip_prefix('#') {
            if pending.has_translation() {
                flush(&mut document, &mut pending, line_no)?;
            }
            parse_comment(&mut pending, rest);
            continue;
        }

        parse_keyword_line(&mut document, &mut pending, line, line_no)?;
    }

    flush(&mut document, &mut pending, input.lines().count() + 1)?;
    Ok(document)
}

fn starts_entry(line: &str) -> bool {
    line.starts_with("msgctxt") || (line.starts_with("msgid") && !line.starts_with("msgid_plural"))
}

fn parse_comment(pending: &mut Pending, rest: &str) {
    if let Some(content) = rest.strip_prefix(',') {
        for flag in content.split(',').map(str::trim).filter(|flag| !flag.is_empty()) {
            if flag == FUZZY_FLAG {
                pending.fuzzy = true;
            } else {
                pending.extras.flags.push(flag.to_string());
            }
        }
    } else if let Some(content) = rest.strip_prefix(':') {
        pending
            .occurrences
            .extend(content.split_whitespace().map(str::to_string));
    } else if let Some(content) = rest.strip_prefix('.') {
        pending.extras.extracted_comments.push(content.trim().to_string());
    } else if let Some(content) = rest.strip_prefix('|') {
        pending.extras.previous.push(content.trim().to_string());
    } else {
        let content = rest.strip_prefix(' ').unwrap_or(rest);
        pending.extras.translator_comments.push(content.to_string());
    }
}

fn parse_keyword_line(
    document: &mut PoDocument,
    pending: &mut Pending,
    line: &str,
    line_no: usize,
) -> Result<(), PoParseError> {
    if let Some(rest) = line.strip_prefix("msgctxt") {
        if pending.has_message() {
            flush(document, pending, line_no)?;
        }
        pending.context = Some(unquote(rest, line_no)?);
        pending.field = Some(Field::Context);
    } else if let Some(rest) = line.strip_prefix("msgid_plural") {
        pending.extras.msgid_plural = Some(unquote(rest, line_no)?);
        pending.field = Some(Field::IdPlural);
    } else if let Some(rest) = line.strip_prefix("msgid") {
        if pending.has_message() {
            flush(document, pending, line_no)?;
        }
        pending.msgid = Some(unquote(rest, line_no)?);
        pending.field = Some(Field::Id);
    } else if let Some(rest) = line.strip_prefix("msgstr[") {
        let (index, value) = rest.split_once(']').ok_or_else(|| PoParseError {
            line: line_no,
            message: "unterminated msgstr index".to_string(),
        })?;
        let index: usize = index.trim().parse().map_err(|_| PoParseError {
            line: line_no,
            message: "invalid msgstr index".to_string(),
        })?;
        let value = unquote(value, line_no)?;
        let forms = &mut pending.extras.msgstr_plural;
        if forms.len() <= index {
            forms.resize(index + 1, String::new());
        }
        forms[index] = value;
        pending.field = Some(Field::StrIndex(index));
    } else if let Some(rest) = line.strip_prefix("msgstr") {
        pending.msgstr = Some(unquote(rest, line_no)?);
        pending.field = Some(Field::Str);
    } else if line.starts_with('"') {
        let value = unquote(line, line_no)?;
        let target = match pending.field {
            Some(Field::Context) => pending.context.as_mut(),
            Some(Field::Id) => pending.msgid.as_mut(),
            Some(Field::IdPlural) => pending.extras.msgid_plural.as_mut(),
            Some(Field::Str) => pending.msgstr.as_mut(),
            Some(Field::StrIndex(index)) => pending.extras.msgstr_plural.get_mut(index),
            None => None,
        };
        match target {
            Some(target) => target.push_str(&value),
            None => {
                return Err(PoParseError {
                    line: line_no,
                    message: "continuation string without a keyword".to_string(),
                });
            }
        }
    } else {
        return Err(PoParseError {
            line: line_no,
            message: format!("unexpected content: {line}"),
        });
    }
    Ok(())
}

fn flush(document: &mut PoDocument, pending: &mut Pending, line_no: usize) -> Result<(), PoParseError> {
    let current = std::mem::take(pending);
    if !current.has_message() {
        // A bare comment block (trailing notes) carries nothing to keep.
        if current.context.is_none() && !current.has_translation() {
            return Ok(());
        }
        return Err(PoParseError {
            line: line_no,
            message: "entry without msgid".to_string(),
        });
    }
    let Some(msgid) = current.msgid else {
        return Ok(());
    };

    if msgid.is_empty() && current.context.is_none() && !current.obsolete && document.header.is_none() {
        let mut flags = current.extras.flags;
        if current.fuzzy {
            flags.insert(0, FUZZY_FLAG.to_string());
        }
        document.header = Some(PoHeader {
            translator_comments: current.extras.translator_comments,
            flags,
            metadata: parse_metadata(current.msgstr.as_deref().unwrap_or("")),
        });
        return Ok(());
    }

    let mut extras = current.extras;
    let translation = match current.msgstr {
        Some(msgstr) => msgstr,
        None => extras.msgstr_plural.first().cloned().unwrap_or_default(),
    };
    if extras.msgid_plural.is_some() && extras.msgstr_plural.is_empty() {
        extras.msgstr_plural.push(translation.clone());
    }
    document.entries.push(MessageEntry {
        source_text: msgid,
        context: current.context,
        translation,
        fuzzy: current.fuzzy,
        occurrences: current.occurrences,
        obsolete: current.obsolete,
    });
    document.extras.push(extras);
    Ok(())
}

fn parse_metadata(msgstr: &str) -> Vec<(String, String)> {
    msgstr
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_once(':') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (line.trim().to_string(), String::new()),
        })
        .collect()
}

/// Strips the surrounding quotes and unescapes in a single pass, so `\\n`
/// stays a backslash followed by `n`.
fn unquote(raw: &str, line_no: usize) -> Result<String, PoParseError> {
    let raw = raw.trim();
    let inner = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| PoParseError {
            line: line_no,
            message: "expected quoted string".to_string(),
        })?;

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => {
                return Err(PoParseError {
                    line: line_no,
                    message: "unterminated string".to_string(),
                });
            }
        }
    }
    Ok(result)
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

pub fn render_po(document: &PoDocument) -> String {
    let mut out = String::new();
    if let Some(header) = &document.header {
        for comment in &header.translator_comments {
            push_comment(&mut out, "#", comment);
        }
        if !header.flags.is_empty() {
            out.push_str(&format!("#, {}\n", header.flags.join(", ")));
        }
        push_string(&mut out, "", "msgid", "", true);
        push_string(&mut out, "", "msgstr", &header.msgstr(), true);
    }

    for (entry, extras) in document.entries.iter().zip(&document.extras) {
        if !out.is_empty() {
            out.push('\n');
        }
        render_entry(&mut out, entry, extras);
    }
    out
}

fn render_entry(out: &mut String, entry: &MessageEntry, extras: &PoExtras) {
    for comment in &extras.translator_comments {
        push_comment(out, "#", comment);
    }
    for comment in &extras.extracted_comments {
        push_comment(out, "#.", comment);
    }
    if !entry.obsolete {
        for line in wrap_references(&entry.occurrences) {
            out.push_str(&format!("#: {line}\n"));
        }
    }
    let mut flags: Vec<&str> = Vec::new();
    if entry.fuzzy {
        flags.push(FUZZY_FLAG);
    }
    flags.extend(extras.flags.iter().map(String::as_str));
    if !flags.is_empty() {
        out.push_str(&format!("#, {}\n", flags.join(", ")));
    }
    if !entry.obsolete {
        for previous in &extras.previous {
            out.push_str(&format!("#| {previous}\n"));
        }
    }

    let prefix = if entry.obsolete { "#~ " } else { "" };
    if let Some(context) = &entry.context {
        push_string(out, prefix, "msgctxt", context, false);
    }
    push_string(out, prefix, "msgid", &entry.source_text, false);
    match &extras.msgid_plural {
        Some(plural) => {
            push_string(out, prefix, "msgid_plural", plural, false);
            for (index, form) in extras.msgstr_plural.iter().enumerate() {
                let value = if index == 0 { &entry.translation } else { form };
                push_string(out, prefix, &format!("msgstr[{index}]"), value, false);
            }
        }
        None => push_string(out, prefix, "msgstr", &entry.translation, false),
    }
}

fn push_comment(out: &mut String, marker: &str, comment: &str) {
    if comment.is_empty() {
        out.push_str(marker);
    } else {
        out.push_str(&format!("{marker} {comment}"));
    }
    out.push('\n');
}

fn push_string(out: &mut String, prefix: &str, keyword: &str, value: &str, force_split: bool) {
    let pieces: Vec<&str> = value.split_inclusive('\n').collect();
    if pieces.len() > 1 || (force_split && !value.is_empty()) {
        out.push_str(&format!("{prefix}{keyword} \"\"\n"));
        for piece in pieces {
            out.push_str(&format!("{prefix}\"{}\"\n", escape(piece)));
        }
    } else {
        out.push_str(&format!("{prefix}{keyword} \"{}\"\n", escape(value)));
    }
}

fn wrap_references(occurrences: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for occurrence in occurrences {
        if !current.is_empty() && current.len() + 1 + occurrence.len() > REFERENCE_WIDTH {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(occurrence);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
