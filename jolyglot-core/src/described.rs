use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use crate::desc::TypeDesc;

/// Types that know their own descriptor.
///
/// This is what recovers the type arguments of a generic value:
/// `Vec<Mock>` describes itself as `List<Mock>` without the caller
/// spelling it out.
///
/// ```
/// use std::collections::HashMap;
/// use jolyglot_core::TypeDesc;
///
/// assert_eq!(TypeDesc::of::<Vec<String>>().to_string(), "List<String>");
/// assert_eq!(
///     TypeDesc::of::<HashMap<i64, Vec<bool>>>().to_string(),
///     "Map<Integer, List<Boolean>>",
/// );
/// assert_eq!(TypeDesc::of::<[f64; 3]>().to_string(), "Number[]");
/// ```
///
/// User structs implement it by declaring a [`Class`](crate::Class) once
/// and applying it to the descriptors of their own type parameters.
pub trait Described {
    /// The descriptor of `Self`.
    fn type_desc() -> TypeDesc;
}

macro_rules! impl_described {
    ($ctor:ident => $($ty:ty),* $(,)?) => {
        $(
            impl Described for $ty {
                fn type_desc() -> TypeDesc {
                    TypeDesc::$ctor()
                }
            }
        )*
    };
}

impl_described!(integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_described!(number => f32, f64);
impl_described!(string => str, String, char);
impl_described!(boolean => bool);
impl_described!(any => serde_json::Value);

// Pointers and options are transparent: JSON has no notation for them
// beyond `null`, which every descriptor accepts.
macro_rules! impl_described_transparent {
    ($($ptr:ident),*) => {
        $(
            impl<T: Described + ?Sized> Described for $ptr<T> {
                fn type_desc() -> TypeDesc {
                    T::type_desc()
                }
            }
        )*
    };
}

impl_described_transparent!(Box, Rc, Arc);

impl<T: Described> Described for Option<T> {
    fn type_desc() -> TypeDesc {
        T::type_desc()
    }
}

impl<T: Described + ?Sized> Described for &T {
    fn type_desc() -> TypeDesc {
        T::type_desc()
    }
}

macro_rules! impl_described_list {
    ($($coll:ident),*) => {
        $(
            impl<T: Described> Described for $coll<T> {
                fn type_desc() -> TypeDesc {
                    TypeDesc::list_of(T::type_desc())
                }
            }
        )*
    };
}

impl_described_list!(Vec, VecDeque, BTreeSet);

impl<T: Described, S> Described for HashSet<T, S> {
    fn type_desc() -> TypeDesc {
        TypeDesc::list_of(T::type_desc())
    }
}

impl<T: Described> Described for [T] {
    fn type_desc() -> TypeDesc {
        TypeDesc::array_of(T::type_desc())
    }
}

impl<T: Described, const N: usize> Described for [T; N] {
    fn type_desc() -> TypeDesc {
        TypeDesc::array_of(T::type_desc())
    }
}

impl<K: Described, V: Described, S> Described for HashMap<K, V, S> {
    fn type_desc() -> TypeDesc {
        TypeDesc::map_of(K::type_desc(), V::type_desc())
    }
}

impl<K: Described, V: Described> Described for BTreeMap<K, V> {
    fn type_desc() -> TypeDesc {
        TypeDesc::map_of(K::type_desc(), V::type_desc())
    }
}

#[cfg(test)]
mod tests {
    use core::marker::PhantomData;

    use super::*;
    use crate::desc::Class;
    use insta::assert_snapshot;
    use jolyglot_testhelpers::test;

    #[allow(dead_code)]
    struct Wrapper<T>(PhantomData<T>);

    impl<T: Described> Described for Wrapper<T> {
        fn type_desc() -> TypeDesc {
            let class = Class::builder("Wrapper")
                .type_param("T")
                .field("t", TypeDesc::var("T"))
                .build();
            TypeDesc::parameterized(&class, [T::type_desc()]).unwrap()
        }
    }

    #[test]
    fn collections_describe_their_elements() {
        assert_snapshot!(TypeDesc::of::<VecDeque<Option<u8>>>(), @"List<Integer>");
        assert_snapshot!(TypeDesc::of::<BTreeMap<String, Box<[char]>>>(), @"Map<String, String[]>");
        assert_snapshot!(TypeDesc::of::<Arc<HashSet<serde_json::Value>>>(), @"List<Any>");
    }

    #[test]
    fn user_generics_nest() {
        assert_snapshot!(
            TypeDesc::of::<Wrapper<Vec<Wrapper<bool>>>>(),
            @"Wrapper<List<Wrapper<Boolean>>>"
        );
    }

    #[test]
    fn unsized_types_are_described() {
        assert_eq!(TypeDesc::of::<str>(), TypeDesc::string());
        assert_eq!(TypeDesc::of::<&[i32]>(), TypeDesc::array_of(TypeDesc::integer()));
        assert!(Arc::ptr_eq(
            TypeDesc::of::<Rc<str>>().raw_class().unwrap(),
            &Class::string()
        ));
    }
}
