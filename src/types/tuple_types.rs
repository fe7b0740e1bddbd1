/// Ordered attribute values of one stored row. The text form is the
/// fields joined with commas; `?` is the query wildcard and never
/// appears in stored tuples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple {
    pub fields: Vec<String>,
}
