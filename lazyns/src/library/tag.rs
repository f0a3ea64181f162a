/// `lib/ns1/ns2/my_lib.rb` is tagged `ns1-ns2-my_lib`, `lib/my_lib.rb` just
/// `my_lib`.
pub fn derive_tag(namespaces: &[String], entry_stem: &str) -> String {
    namespaces
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(entry_stem))
        .collect::<Vec<_>>()
        .join("-")
}
