use std::{ops::Deref, sync::Arc};

/// Either a plain borrow or a shared owner of `T`, letting types such as DB
/// writers accept both `&T` and `Arc<T>` without an extra generic parameter.
pub enum Refs<'a, T> {
    Ref(&'a T),
    Arc(Arc<T>),
}

impl<T> Deref for Refs<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        match self {
            Refs::Ref(r) => r,
            Refs::Arc(a) => a,
        }
    }
}

impl<'a, T> From<&'a T> for Refs<'a, T> {
    fn from(value: &'a T) -> Self {
        Self::Ref(value)
    }
}

impl<T> From<Arc<T>> for Refs<'_, T> {
    fn from(value: Arc<T>) -> Self {
        Self::Arc(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refs_deref() {
        let value = 5u32;
        let by_ref: Refs<u32> = (&value).into();
        let by_arc: Refs<u32> = Arc::new(7u32).into();
        assert_eq!(*by_ref + *by_arc, 12);
    }
}
