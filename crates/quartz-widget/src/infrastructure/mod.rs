//! Infrastructure layer providing the widget's storage backends.

pub mod storage;
