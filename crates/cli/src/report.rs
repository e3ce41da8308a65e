use anyhow::{Result, bail};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Sum,
    Product,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub operation: Operation,
    pub numbers: Vec<i32>,
    pub result: i64,
}

pub fn compute(operation: Operation, numbers: &[i32]) -> Result<Report> {
    let result = match operation {
        Operation::Sum => numbers.iter().map(|&n| i64::from(n)).sum(),
        Operation::Product => {
            let mut acc: i64 = 1;
            for &n in numbers {
                let Some(next) = acc.checked_mul(i64::from(n)) else {
                    bail!("product of {} numbers overflows a 64-bit integer", numbers.len());
                };
                acc = next;
            }
            acc
        }
    };
    Ok(Report {
        operation,
        numbers: numbers.to_vec(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_and_product() {
        assert_eq!(compute(Operation::Sum, &[1, 2, 3]).unwrap().result, 6);
        assert_eq!(compute(Operation::Product, &[2, 3, 4]).unwrap().result, 24);
        assert_eq!(compute(Operation::Product, &[]).unwrap().result, 1);
    }

    #[test]
    fn product_overflow_is_an_error() {
        let big = vec![i32::MAX; 4];
        assert!(compute(Operation::Product, &big).is_err());
    }
}
