//! Constant-time equality for secrets.
//!
//! Comparison time depends only on the lengths of the inputs, never on where
//! the first differing byte is. The byte comparisons are done with `cmov`'s
//! branch-free conditional moves.

use cmov::CmovEq;

pub trait ConstantTime {
    fn ct_eq(&self, rhs: &Self) -> bool;

    fn ct_ne(&self, rhs: &Self) -> bool {
        !self.ct_eq(rhs)
    }
}

impl ConstantTime for u8 {
    fn ct_eq(&self, rhs: &Self) -> bool {
        let mut eq = 0u8;
        self.cmoveq(rhs, 1u8, &mut eq);
        eq != 0u8
    }
}

impl ConstantTime for [u8] {
    fn ct_eq(&self, rhs: &Self) -> bool {
        // length is not secret
        if self.len() != rhs.len() {
            return false;
        }

        let mut eq = 1u8;
        self.iter()
            .zip(rhs)
            .for_each(|(a, b)| a.cmovne(b, 0u8, &mut eq));
        eq != 0u8
    }
}

impl ConstantTime for str {
    fn ct_eq(&self, rhs: &Self) -> bool {
        self.as_bytes().ct_eq(rhs.as_bytes())
    }
}
