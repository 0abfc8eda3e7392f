/// A maximal run of non-blank lines. Never empty.
pub type Stanza = Vec<String>;

/// Split lines into blank-line-delimited stanzas.
pub fn segment<S: AsRef<str>>(lines: &[S]) -> Vec<Stanza> {
    let mut stanzas: Vec<Stanza> = Vec::new();
    let mut current: Stanza = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            if !current.is_empty() {
                stanzas.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.to_string());
        }
    }

    if !current.is_empty() {
        stanzas.push(current);
    }

    stanzas
}
