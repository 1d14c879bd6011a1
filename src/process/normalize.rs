use std::collections::{HashMap, HashSet};

/// `" Molecule-ID "` → `"molecule_id"`.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Make column names unique by suffixing repeats.
///
/// The first occurrence keeps its name, the k-th repeat becomes `name_k`:
/// `[x, y, x, x]` → `[x, y, x_1, x_2]`. Positions never move.
pub fn make_unique_columns<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for n in names {
        *counts.entry(n.as_ref()).or_default() += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    let renamed: Vec<String> = names
        .iter()
        .map(|n| {
            let n = n.as_ref();
            if counts[n] == 1 {
                return n.to_string();
            }
            let k = seen.entry(n).or_default();
            let out = if *k == 0 {
                n.to_string()
            } else {
                format!("{}_{}", n, k)
            };
            *k += 1;
            out
        })
        .collect();

    // a suffixed name may collide with a column that already had that name
    // (`[x, x, x_1]`); resolve those the same way until nothing repeats
    let unique: HashSet<&str> = renamed.iter().map(String::as_str).collect();
    if unique.len() == renamed.len() {
        renamed
    } else {
        make_unique_columns(&renamed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_names() {
        assert_eq!(normalize_column_name("Smiles"), "smiles");
        assert_eq!(normalize_column_name("  Activity "), "activity");
        assert_eq!(normalize_column_name("Molecule ID"), "molecule_id");
        assert_eq!(normalize_column_name("pIC50-value"), "pic50_value");
        assert_eq!(normalize_column_name("a - b"), "a___b");
    }

    #[test]
    fn suffixes_repeats_in_place() {
        let out = make_unique_columns(&["x", "y", "x", "x"]);
        assert_eq!(out, vec!["x", "y", "x_1", "x_2"]);
    }

    #[test]
    fn unique_input_unchanged() {
        let names = vec!["smiles", "activity", "source", "dataset"];
        let out = make_unique_columns(&names);
        assert_eq!(out, names);
        // applying it twice changes nothing
        assert_eq!(make_unique_columns(&out), out);
    }

    #[test]
    fn resolves_collision_with_existing_suffix() {
        let out = make_unique_columns(&["x", "x", "x_1"]);
        let set: HashSet<&String> = out.iter().collect();
        assert_eq!(set.len(), 3);
        assert_eq!(out[0], "x");
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn empty_names() {
        let out = make_unique_columns(&["", ""]);
        assert_eq!(out, vec!["", "_1"]);
    }
}
