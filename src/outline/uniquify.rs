use std::collections::HashSet;

/// Return `candidate` if unused, otherwise the first of `candidate-1`,
/// `candidate-2`, ... that is. Does not record the result in `used`.
pub fn uniquify(candidate: &str, used: &HashSet<String>) -> String {
    if !used.contains(candidate) {
        return candidate.to_string();
    }
    let mut counter = 1u32;
    loop {
        let id = format!("{candidate}-{counter}");
        if !used.contains(&id) {
            return id;
        }
        counter += 1;
    }
}
