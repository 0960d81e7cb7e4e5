//! Fixed key material shared by the unit tests.

pub const DSA_P: &str = "8OM9bDYZuxF8/DobM46V3nHrWrPDzqi/v+cFd7tCvZPquWy94mwQCHOTiO6VdLj03lhZn/7Bm3e/TOgwoq0eMob69jV6XjCaNs9ESXyvvrUC6/D9pg4sxpYt59l1XA0FFyCwFbk225Rk6Koc7R9Dl9w9uTwrO4VZbYMSfUc+fQM=";
pub const DSA_Q: &str = "wFTlMtYjjadcwaN+XsLsFkApY/E=";
pub const DSA_G: &str = "GQFKOjQ/GW/dwbsrsYHRFpJsG3bWFZ00+uoPimTIiYkyCTeE8XJAgPYVFFdtfUSIxoMmMpy61qvHoO9b9vUzCtFKhuGi5H5XeMzBFA+sKbEPyhwNmji62cOnXNI/5fojplNAJKHXY39WX3+sJ2uuj6c7g6lE5cQ9TQhSEK7h57c=";
pub const DSA_Y: &str = "h6PUT8gGs66xed2AQ3Ono5BzRtxeZAKp9m1PxuaxuT5hNB08TSB+sT6MKRIXayP7ZoF2dCdojXMW0N67g+7SdVaf7YrbTGftYK9bMSA0yjVHybNs7wDbSuXUSeRz+ZuYryipfts7z82zZxH+O/b9GK214R7eG6xwbQDDjIhM/C4=";
/// Another public key in the same DSA group: g^2 mod p.
pub const DSA_Y_OTHER: &str = "CZ2kEZZ3JMBtkBZyPYYnHkqGnBG5/kaolEIVeoX9x8MxLVjlq/cMBEvtru6xp3bpbfoUMapLEeSbHf7tbSbrzGPTUQaUnOma97KhYgLuzAuRp+JcYFhMRqjxmKyU7OyfrS4rg299XPkIXJlDz+w7EtH3N6ee/8LAtFLnn6j3YBs=";
pub const RSA_MODULUS: &str = "2yOU3bov8DkHyvonu/3k9ZCQR6g13uFOWdOht3LGtHUNW5YGiyZCQVCgjiNjXatG7LUkHvbe/RrL14ybkkhmp2QrWI7g1LRtvIDkFdKb9mGjzsIK4x8RvrWiGs1DNAy1kGelHgzhF21aKIi7QOKTI+ccv9S4oip3gSMB+i/CSOU=";
pub const EC_P256_POINT: &str = "BCE1t9JjTLUAXCmM4XVbSeAx/GFcaXfh6+3H81RRKi/uwpc2okQcwJcfgUUAdjaIBe1zgvGVEh67I11o3rW8viE=";

pub const RSA_CERT: &str = include_str!("../testdata/rsa_cert.b64");
pub const DSA_CERT: &str = include_str!("../testdata/dsa_cert.b64");
pub const EC_CERT: &str = include_str!("../testdata/ec_cert.b64");
