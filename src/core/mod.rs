//! Общие типы и промежуточное представление, не зависящие от символики.

pub mod pattern;
pub mod types;
