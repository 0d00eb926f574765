use lazy_static::lazy_static;
use sonyflake::{Error, Sonyflake};

lazy_static! {
    static ref GENERATOR: Sonyflake =
        Sonyflake::new().expect("sonyflake generator init");
}

pub fn next_id() -> Result<u64, Error> {
    GENERATOR.next_id()
}

#[cfg(test)]
mod tests {
    use super::next_id;

    #[test]
    fn test_next_id_monotonic() {
        let first = next_id().unwrap();
        let second = next_id().unwrap();
        assert!(second > first);
    }
}
