/// Order-sensitive merge of two reader results.
///
/// `a.combine(b)` must leave `a` holding `a` followed by `b`, and the
/// operation must be associative so the fold order is the only thing that
/// matters.
pub trait Combine {
    fn combine(&mut self, other: Self);
}

impl<T> Combine for Vec<T> {
    fn combine(&mut self, other: Self) { self.extend(other); }
}

impl Combine for String {
    fn combine(&mut self, other: Self) { self.push_str(&other); }
}

impl Combine for () {
    fn combine(&mut self, _other: Self) {}
}

/// Fold results left to right, stopping at the first error.
///
/// Returns `Ok(None)` for an empty input.
pub fn try_combine_all<T, E, I>(results: I) -> Result<Option<T>, E>
where
    T: Combine,
    I: IntoIterator<Item = Result<T, E>>,
{
    let mut aggregate: Option<T> = None;
    for result in results {
        let result = result?;
        match aggregate.as_mut() {
            Some(acc) => acc.combine(result),
            None => aggregate = Some(result),
        }
    }
    Ok(aggregate)
}
