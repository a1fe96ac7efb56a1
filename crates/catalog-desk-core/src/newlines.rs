pub fn fix_newlines(original: &str, submitted: &str) -> String {
    if original.is_empty() || submitted.is_empty() {
        return submitted.to_string();
    }

    let mut out = if submitted.contains('\r') && !original.contains('\r') {
        submitted.replace('\r', "")
    } else {
        submitted.to_string()
    };

    if original.starts_with('\n') && !out.starts_with('\n') {
        out.insert(0, '\n');
    } else if !original.starts_with('\n') && out.starts_with('\n') {
        out = out.trim_start().to_string();
    }

    if original.ends_with('\n') && !out.ends_with('\n') {
        out.push('\n');
    } else if !original.ends_with('\n') && out.ends_with('\n') {
        out = out.trim_end().to_string();
    }

    out
}

pub fn translations_match(live: &str, expected: &str) -> bool {
    if live == expected {
        return true;
    }
    if !live.contains('\r') && !expected.contains('\r') {
        return false;
    }
    strip_carriage_returns(live) == strip_carriage_returns(expected)
}

fn strip_carriage_returns(value: &str) -> String {
    value.chars().filter(|ch| *ch != '\r').collect()
}
