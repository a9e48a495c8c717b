use rand::Rng;

/// Salary assigned to imported employees: a uniform whole number in
/// `[min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SalaryPolicy {
    min: u32,
    max: u32,
}

impl Default for SalaryPolicy {
    fn default() -> Self {
        Self {
            min: 1000,
            max: 5000,
        }
    }
}

impl SalaryPolicy {
    pub fn random_salary(&self) -> f64 {
        f64::from(rand::thread_rng().gen_range(self.min..self.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_is_half_open() {
        let policy = SalaryPolicy::default();
        for _ in 0..1000 {
            let salary = policy.random_salary();
            assert!((1000.0..5000.0).contains(&salary));
            assert_eq!(salary.fract(), 0.0);
        }
    }
}
