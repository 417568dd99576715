//! Scalar fields the round numbers are commonly requested for.

use num_bigint::BigUint;

/// A named prime field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownField {
    pub name: &'static str,
    /// Field characteristic in hexadecimal, without a prefix.
    pub modulus_hex: &'static str,
    /// Smallest exponent `alpha` for which `x^alpha` permutes the field, or `-1`
    /// for fields that use the inversion S-box because no exponent below 11 does.
    pub sbox_exponent: i64,
}

impl KnownField {
    pub fn modulus(&self) -> BigUint {
        // The table below only holds valid hexadecimal literals
        BigUint::parse_bytes(self.modulus_hex.as_bytes(), 16).unwrap_or_default()
    }
}

/// MNT4-753 scalar field.
pub const MNT4_753: KnownField = KnownField {
    name: "MNT4-753",
    modulus_hex: "1c4c62d92c41110229022eee2cdadb7f997505b8fafed5eb7e8f96c97d87307fdb925e8a0ed8d99d124d9a15af79db26c5c28c859a99b3eebca9429212636b9dff97634993aa4d6c381bc3f0057974ea099170fa13a4fd90776e240000001",
    sbox_exponent: -1,
};

/// MNT6-753 scalar field.
pub const MNT6_753: KnownField = KnownField {
    name: "MNT6-753",
    modulus_hex: "1c4c62d92c41110229022eee2cdadb7f997505b8fafed5eb7e8f96c97d87307fdb925e8a0ed8d99d124d9a15af79db117e776f218059db80f0da5cb537e38685acce9767254a4638810719ac425f0e39d54522cdd119f5e9063de245e8001",
    sbox_exponent: -1,
};

pub const BN382: KnownField = KnownField {
    name: "BN-382",
    modulus_hex: "2404893fdad8878e71503c69b09dbf88b48a3614289b09012012246d2242412000000001800c18180000000000000001",
    sbox_exponent: 5,
};

/// Base field of BN-382, the scalar field of its cycle partner.
pub const BN382_DUAL: KnownField = KnownField {
    name: "BN-382-dual",
    modulus_hex: "2404893fdad8878e71503c69b09dbf88b48a3614289b0901801830918303018000000001800c18180000000000000001",
    sbox_exponent: 5,
};

pub const TWEEDLE_DEE: KnownField = KnownField {
    name: "Tweedle-dee",
    modulus_hex: "40000000000000000000000000000000038aa1276c3f59b9a14064e200000001",
    sbox_exponent: 5,
};

pub const TWEEDLE_DUM: KnownField = KnownField {
    name: "Tweedle-dum",
    modulus_hex: "40000000000000000000000000000000038aa127696286c9842cafd400000001",
    sbox_exponent: 5,
};

pub const BN254: KnownField = KnownField {
    name: "BN254",
    modulus_hex: "30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001",
    sbox_exponent: 5,
};

pub const BLS12_381: KnownField = KnownField {
    name: "BLS12-381",
    modulus_hex: "73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001",
    sbox_exponent: 5,
};

/// `2^64 - 2^32 + 1`
pub const GOLDILOCKS: KnownField = KnownField {
    name: "Goldilocks",
    modulus_hex: "ffffffff00000001",
    sbox_exponent: 7,
};

/// `2^31 - 2^27 + 1`
pub const BABY_BEAR: KnownField = KnownField {
    name: "BabyBear",
    modulus_hex: "78000001",
    sbox_exponent: 7,
};

/// `2^31 - 1`
pub const MERSENNE_31: KnownField = KnownField {
    name: "Mersenne-31",
    modulus_hex: "7fffffff",
    sbox_exponent: 5,
};

pub const KNOWN_FIELDS: [KnownField; 11] = [
    MNT4_753,
    MNT6_753,
    BN382,
    BN382_DUAL,
    TWEEDLE_DEE,
    TWEEDLE_DUM,
    BN254,
    BLS12_381,
    GOLDILOCKS,
    BABY_BEAR,
    MERSENNE_31,
];

/// Looks a field up by name, ignoring ASCII case.
pub fn find_field(name: &str) -> Option<KnownField> {
    KNOWN_FIELDS
        .iter()
        .copied()
        .find(|field| field.name.eq_ignore_ascii_case(name))
}
