//! [`Traits`] implementations for composite values.
//!
//! Covers fixed arrays, `Vec`, ordered and unordered maps and sets, tuples of
//! arity 1 to 4, and numeric `ndarray` matrices. Every composite is nullable
//! through `Option<Self>` and rejects `from_text` with `NotImplemented`.
//!
//! Text forms: sequences and matrices `[a,b]` (matrices flattened row-major),
//! sets `{a,b}`, maps `{k:v}`, tuples `(a,b)`.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use ndarray::Array2;

use crate::archive::Archive;
use crate::error::{FeaturizerError, FormatError, Result};
use crate::hash::combine;
use crate::num::IntOrNumeric;
use crate::traits::{null_optional, Traits};

macro_rules! nullable_via_option {
    () => {
        type Nullable = Option<Self>;
        type Value = Self;

        fn create_null_value() -> Self::Nullable {
            None
        }

        fn is_null(value: &Self::Nullable) -> bool {
            value.is_none()
        }

        fn get_nullable_value(value: &Self::Nullable) -> Result<Self::Value> {
            value.clone().ok_or_else(null_optional)
        }

        fn into_nullable(self) -> Self::Nullable {
            Some(self)
        }

        fn from_text(_text: &str) -> Result<Self> {
            Err(FeaturizerError::not_implemented())
        }
    };
}

fn join_text<'a, T: Traits + 'a>(
    items: impl Iterator<Item = &'a T>,
    open: char,
    close: char,
) -> String {
    let mut text = String::new();
    text.push(open);
    for (i, item) in items.enumerate() {
        if i > 0 {
            text.push(',');
        }
        text.push_str(&item.to_text());
    }
    text.push(close);
    text
}

fn join_pairs<'a, K: Traits + 'a, V: Traits + 'a>(
    pairs: impl Iterator<Item = (&'a K, &'a V)>,
) -> String {
    let parts: Vec<String> = pairs
        .map(|(k, v)| format!("{}:{}", k.to_text(), v.to_text()))
        .collect();
    format!("{{{}}}", parts.join(","))
}

fn elementwise_equal<'a, T: Traits + 'a>(
    a: impl ExactSizeIterator<Item = &'a T>,
    b: impl ExactSizeIterator<Item = &'a T>,
) -> bool {
    a.len() == b.len() && a.zip(b).all(|(x, y)| T::key_equal(x, y))
}

fn ordered_hash<'a, T: Traits + 'a>(items: impl Iterator<Item = &'a T>, seed: u32) -> u32 {
    items.fold(seed, |h, item| combine(h, item.hash_key(seed)))
}

fn unordered_hash(hashes: impl Iterator<Item = u32>, seed: u32) -> u32 {
    combine(seed, hashes.fold(0u32, u32::wrapping_add))
}

fn serialize_items<'a, T: Traits + 'a>(
    len: usize,
    items: impl Iterator<Item = &'a T>,
    archive: &mut Archive,
) -> Result<()> {
    archive.write_len(len)?;
    for item in items {
        item.serialize(archive)?;
    }
    Ok(())
}

fn deserialize_items<T: Traits>(archive: &mut Archive) -> Result<Vec<T>> {
    let len = archive.read_len()?;
    let mut items = Vec::with_capacity(len.min(archive.remaining()));
    for _ in 0..len {
        items.push(T::deserialize(archive)?);
    }
    Ok(items)
}

fn deserialize_pairs<K: Traits, V: Traits>(archive: &mut Archive) -> Result<Vec<(K, V)>> {
    let len = archive.read_len()?;
    let mut pairs = Vec::with_capacity(len.min(archive.remaining()));
    for _ in 0..len {
        let key = K::deserialize(archive)?;
        let value = V::deserialize(archive)?;
        pairs.push((key, value));
    }
    Ok(pairs)
}

// ============================================================================
// Sequences
// ============================================================================

impl<T: Traits, const N: usize> Traits for [T; N] {
    nullable_via_option!();

    fn to_text(&self) -> String {
        join_text(self.iter(), '[', ']')
    }

    fn key_equal(a: &Self, b: &Self) -> bool {
        elementwise_equal(a.iter(), b.iter())
    }

    fn serialize(&self, archive: &mut Archive) -> Result<()> {
        for item in self {
            item.serialize(archive)?;
        }
        Ok(())
    }

    fn deserialize(archive: &mut Archive) -> Result<Self> {
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(T::deserialize(archive)?);
        }
        items
            .try_into()
            .map_err(|_| FormatError::LengthOverflow(N).into())
    }

    fn hash_key(&self, seed: u32) -> u32 {
        ordered_hash(self.iter(), seed)
    }
}

impl<T: Traits> Traits for Vec<T> {
    nullable_via_option!();

    fn to_text(&self) -> String {
        join_text(self.iter(), '[', ']')
    }

    fn key_equal(a: &Self, b: &Self) -> bool {
        elementwise_equal(a.iter(), b.iter())
    }

    fn serialize(&self, archive: &mut Archive) -> Result<()> {
        serialize_items(self.len(), self.iter(), archive)
    }

    fn deserialize(archive: &mut Archive) -> Result<Self> {
        deserialize_items(archive)
    }

    fn hash_key(&self, seed: u32) -> u32 {
        ordered_hash(self.iter(), seed)
    }
}

// ============================================================================
// Maps and sets
// ============================================================================

impl<K: Traits + Ord, V: Traits> Traits for BTreeMap<K, V> {
    nullable_via_option!();

    fn to_text(&self) -> String {
        join_pairs(self.iter())
    }

    fn key_equal(a: &Self, b: &Self) -> bool {
        a.len() == b.len()
            && a
                .iter()
                .zip(b.iter())
                .all(|((ka, va), (kb, vb))| K::key_equal(ka, kb) && V::key_equal(va, vb))
    }

    fn serialize(&self, archive: &mut Archive) -> Result<()> {
        archive.write_len(self.len())?;
        for (key, value) in self {
            key.serialize(archive)?;
            value.serialize(archive)?;
        }
        Ok(())
    }

    fn deserialize(archive: &mut Archive) -> Result<Self> {
        Ok(deserialize_pairs(archive)?.into_iter().collect())
    }

    fn hash_key(&self, seed: u32) -> u32 {
        self.iter().fold(seed, |h, (k, v)| {
            combine(h, combine(k.hash_key(seed), v.hash_key(seed)))
        })
    }
}

impl<K: Traits + Eq + Hash, V: Traits> Traits for HashMap<K, V> {
    nullable_via_option!();

    fn to_text(&self) -> String {
        join_pairs(self.iter())
    }

    fn key_equal(a: &Self, b: &Self) -> bool {
        a.len() == b.len()
            && a
                .iter()
                .all(|(k, va)| b.get(k).is_some_and(|vb| V::key_equal(va, vb)))
    }

    fn serialize(&self, archive: &mut Archive) -> Result<()> {
        archive.write_len(self.len())?;
        for (key, value) in self {
            key.serialize(archive)?;
            value.serialize(archive)?;
        }
        Ok(())
    }

    fn deserialize(archive: &mut Archive) -> Result<Self> {
        Ok(deserialize_pairs(archive)?.into_iter().collect())
    }

    fn hash_key(&self, seed: u32) -> u32 {
        unordered_hash(
            self.iter()
                .map(|(k, v)| combine(k.hash_key(seed), v.hash_key(seed))),
            seed,
        )
    }
}

impl<T: Traits + Ord> Traits for BTreeSet<T> {
    nullable_via_option!();

    fn to_text(&self) -> String {
        join_text(self.iter(), '{', '}')
    }

    fn serialize(&self, archive: &mut Archive) -> Result<()> {
        serialize_items(self.len(), self.iter(), archive)
    }

    fn deserialize(archive: &mut Archive) -> Result<Self> {
        Ok(deserialize_items(archive)?.into_iter().collect())
    }

    fn hash_key(&self, seed: u32) -> u32 {
        ordered_hash(self.iter(), seed)
    }
}

impl<T: Traits + Eq + Hash> Traits for HashSet<T> {
    nullable_via_option!();

    fn to_text(&self) -> String {
        join_text(self.iter(), '{', '}')
    }

    fn serialize(&self, archive: &mut Archive) -> Result<()> {
        serialize_items(self.len(), self.iter(), archive)
    }

    fn deserialize(archive: &mut Archive) -> Result<Self> {
        Ok(deserialize_items(archive)?.into_iter().collect())
    }

    fn hash_key(&self, seed: u32) -> u32 {
        unordered_hash(self.iter().map(|item| item.hash_key(seed)), seed)
    }
}

// ============================================================================
// Tuples
// ============================================================================

macro_rules! impl_traits_for_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Traits),+> Traits for ($($name,)+) {
            nullable_via_option!();

            fn to_text(&self) -> String {
                let parts: Vec<String> = vec![$(self.$idx.to_text()),+];
                format!("({})", parts.join(","))
            }

            fn key_equal(a: &Self, b: &Self) -> bool {
                true $(&& $name::key_equal(&a.$idx, &b.$idx))+
            }

            fn serialize(&self, archive: &mut Archive) -> Result<()> {
                $(self.$idx.serialize(archive)?;)+
                Ok(())
            }

            fn deserialize(archive: &mut Archive) -> Result<Self> {
                Ok(($($name::deserialize(archive)?,)+))
            }

            fn hash_key(&self, seed: u32) -> u32 {
                let h = seed;
                $(let h = combine(h, self.$idx.hash_key(seed));)+
                h
            }
        }
    };
}

impl_traits_for_tuple!(A: 0);
impl_traits_for_tuple!(A: 0, B: 1);
impl_traits_for_tuple!(A: 0, B: 1, C: 2);
impl_traits_for_tuple!(A: 0, B: 1, C: 2, D: 3);

// ============================================================================
// Matrices
// ============================================================================

impl<T: Traits + IntOrNumeric> Traits for Array2<T> {
    nullable_via_option!();

    fn to_text(&self) -> String {
        join_text(self.iter(), '[', ']')
    }

    fn key_equal(a: &Self, b: &Self) -> bool {
        a.dim() == b.dim() && a.iter().zip(b.iter()).all(|(x, y)| T::key_equal(x, y))
    }

    fn serialize(&self, archive: &mut Archive) -> Result<()> {
        let (rows, cols) = self.dim();
        archive.write_len(rows)?;
        archive.write_len(cols)?;
        for item in self {
            item.serialize(archive)?;
        }
        Ok(())
    }

    fn deserialize(archive: &mut Archive) -> Result<Self> {
        let rows = archive.read_len()?;
        let cols = archive.read_len()?;
        let count = rows
            .checked_mul(cols)
            .ok_or(FormatError::ShapeMismatch { rows, cols })?;

        let mut items = Vec::with_capacity(count.min(archive.remaining()));
        for _ in 0..count {
            items.push(T::deserialize(archive)?);
        }

        Array2::from_shape_vec((rows, cols), items)
            .map_err(|_| FormatError::ShapeMismatch { rows, cols }.into())
    }

    fn hash_key(&self, seed: u32) -> u32 {
        let (rows, cols) = self.dim();
        let shape = combine(seed, combine(rows as u32, cols as u32));
        self.iter()
            .fold(shape, |h, item| combine(h, item.hash_key(seed)))
    }
}
