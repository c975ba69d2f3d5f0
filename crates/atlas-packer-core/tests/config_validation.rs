use atlas_packer_core::error::PackerError;
use atlas_packer_core::prelude::*;

#[test]
fn defaults_match_documented_values() {
    let cfg = PackerConfig::default();
    assert_eq!(cfg.padding, 2);
    assert_eq!(cfg.max_size, 4096);
    assert!(!cfg.parallel);
    assert!(cfg.validate().is_ok());
}

#[test]
fn zero_max_size_is_rejected() {
    let cfg = PackerConfig::builder().max_size(0).build();
    match cfg.validate() {
        Err(PackerError::InvalidMaxSize(0)) => {}
        other => panic!("Expected InvalidMaxSize error, got {:?}", other),
    }
}

#[test]
fn padding_overflow_is_rejected() {
    let cfg = PackerConfig::builder()
        .max_size(i32::MAX as u32)
        .padding(1)
        .build();
    match cfg.validate() {
        Err(PackerError::InvalidConfig(msg)) => assert!(msg.contains("padding")),
        other => panic!("Expected InvalidConfig error, got {:?}", other),
    }
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let cfg: PackerConfig = serde_json::from_str(r#"{ "max_size": 512 }"#).unwrap();
    assert_eq!(cfg.max_size, 512);
    assert_eq!(cfg.padding, 2);
    assert!(!cfg.parallel);
}
