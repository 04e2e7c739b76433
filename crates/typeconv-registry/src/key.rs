use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a domain type used as a registry key.
///
/// Equality and hashing use the [`TypeId`] only; the type name is carried
/// for diagnostics and is not guaranteed to be unique or stable.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The key for `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The underlying [`TypeId`].
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Human-readable type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path, e.g. `Person` for `app::model::Person`.
    pub fn short_name(&self) -> &'static str {
        match self.name.find('<') {
            Some(generic) => {
                let head = &self.name[..generic];
                match head.rfind("::") {
                    Some(pos) => &self.name[pos + 2..],
                    None => self.name,
                }
            }
            None => self.name.rsplit("::").next().unwrap_or(self.name),
        }
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod model {
        pub struct Person;
        pub struct Wrapper<T>(pub T);
    }

    #[test]
    fn equality_by_type() {
        assert_eq!(TypeKey::of::<String>(), TypeKey::of::<String>());
        assert_ne!(TypeKey::of::<String>(), TypeKey::of::<&'static str>());
        assert_ne!(TypeKey::of::<model::Person>(), TypeKey::of::<String>());
    }

    #[test]
    fn short_name_strips_module_path() {
        assert_eq!(TypeKey::of::<model::Person>().short_name(), "Person");
        assert_eq!(TypeKey::of::<u64>().short_name(), "u64");
        assert!(TypeKey::of::<model::Wrapper<u8>>()
            .short_name()
            .starts_with("Wrapper<"));
    }

    #[test]
    fn distinct_generic_instantiations() {
        assert_ne!(
            TypeKey::of::<model::Wrapper<u8>>(),
            TypeKey::of::<model::Wrapper<u16>>()
        );
    }
}
