use tidy_protocol::CONLLU_COLUMNS;

/// Splits a token line on tabs into exactly ten fields.
///
/// On a count mismatch the number of fields actually found is returned.
pub fn split_fields(line: &str) -> Result<[&str; CONLLU_COLUMNS], usize> {
    let mut fields = [""; CONLLU_COLUMNS];
    let mut found = 0;

    for field in line.split('\t') {
        if found < CONLLU_COLUMNS {
            fields[found] = field;
        }
        found += 1;
    }

    if found == CONLLU_COLUMNS {
        Ok(fields)
    } else {
        Err(found)
    }
}
