//! Name normalization shared by every generator.
//!
//! LoopBack projects address models and applications by slug
//! (`common/models/get-quote-response.json`, `package.json` `name`), while
//! model names inside documents keep their original spelling. Everything that
//! turns a human or WSDL name into a file or identifier goes through here.

/// Convert a name into a lower-kebab-case slug.
///
/// | Input | Output |
/// |-------|--------|
/// | `GetQuoteResponse` | `get-quote-response` |
/// | `RPCLiteralTest2.0Binding` | `rpc-literal-test-2-0-binding` |
/// | `x.y`, `x y`, `x@y` | `x-y` |
pub fn slugify(name: &str) -> String {
    split_words(name).join("-")
}

/// Convert a name into snake_case.
pub fn to_snake_case(name: &str) -> String {
    split_words(name).join("_")
}

/// Convert a name into PascalCase.
pub fn to_pascal_case(name: &str) -> String {
    split_words(name)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = String::new();
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                    out
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Split a string into lowercase words.
///
/// ## Word Boundary Detection
///
/// 1. **Separators:** any character that is not alphanumeric
/// 2. **camelCase:** `aB` splits between `a` and `B`
/// 3. **Acronyms:** `RPCLiteral` splits between `C` and `L`
///    (`Upper Upper Lower` pattern)
/// 4. **Digits:** `Test2` and `0Binding` split at the letter/digit change
fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            flush(&mut current, &mut words);
            continue;
        }

        current.push(c);

        let Some(&next) = chars.get(i + 1) else {
            continue;
        };
        if !next.is_alphanumeric() {
            continue;
        }

        let camel = c.is_lowercase() && next.is_uppercase();
        let digit_change = c.is_alphabetic() != next.is_alphabetic();
        let acronym = c.is_uppercase()
            && next.is_uppercase()
            && chars.get(i + 2).is_some_and(|n| n.is_lowercase());

        if camel || digit_change || acronym {
            flush(&mut current, &mut words);
        }
    }

    flush(&mut current, &mut words);
    words
}

fn flush(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(current.to_lowercase());
        current.clear();
    }
}
