/// Splits one raw CSV line into trimmed field values.
///
/// This is deliberately not RFC 4180: a double quote toggles quoted mode and
/// is never copied to the output, a comma separates fields only outside
/// quoted mode, and doubled quotes inside a quoted field are not collapsed.
/// The spreadsheet export this feed comes from never produces that case.
/// Malformed quoting (an odd number of quote characters) yields a
/// best-effort split with no diagnostic.
pub fn tokenize_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}
