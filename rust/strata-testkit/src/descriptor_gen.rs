//! Random type descriptor generation.

use strata_types::{PrimitiveKind, TypeDescriptor};

const NAME_START: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const NAME_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates random, well-formed type descriptors from a fixed seed.
///
/// Struct field names are alphanumeric, so every generated descriptor can be
/// written in the descriptor grammar. Structs always have at least one field.
pub struct DescriptorGenerator {
    rng: fastrand::Rng,
    max_depth: usize,
    max_fields: usize,
}

impl DescriptorGenerator {
    pub fn new(seed: u64) -> DescriptorGenerator {
        DescriptorGenerator {
            rng: fastrand::Rng::with_seed(seed),
            max_depth: 4,
            max_fields: 5,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> DescriptorGenerator {
        self.max_depth = max_depth;
        self
    }

    pub fn generate(&mut self) -> TypeDescriptor {
        self.generate_at(0)
    }

    pub fn generate_list(&mut self, count: usize) -> Vec<TypeDescriptor> {
        (0..count).map(|_| self.generate()).collect()
    }

    pub fn primitive(&mut self) -> PrimitiveKind {
        PrimitiveKind::ALL[self.rng.usize(..PrimitiveKind::ALL.len())]
    }

    pub fn field_name(&mut self) -> String {
        let len = self.rng.usize(0..8);
        let mut name = String::with_capacity(len + 1);
        name.push(NAME_START[self.rng.usize(..NAME_START.len())] as char);
        for _ in 0..len {
            name.push(NAME_CHARS[self.rng.usize(..NAME_CHARS.len())] as char);
        }
        name
    }

    fn generate_at(&mut self, depth: usize) -> TypeDescriptor {
        if depth >= self.max_depth {
            return TypeDescriptor::primitive(self.primitive());
        }
        match self.rng.u8(0..4) {
            0 => TypeDescriptor::primitive(self.primitive()),
            1 => TypeDescriptor::list(self.generate_at(depth + 1)),
            2 => {
                let key = self.generate_at(depth + 1);
                TypeDescriptor::map(key, self.generate_at(depth + 1))
            }
            _ => {
                let count = self.rng.usize(1..=self.max_fields);
                let fields = (0..count)
                    .map(|_| (self.field_name(), self.generate_at(depth + 1)))
                    .collect::<Vec<_>>();
                TypeDescriptor::structure(fields)
            }
        }
    }
}
