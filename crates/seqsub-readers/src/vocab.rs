//! Controlled vocabularies shared by the submission types.
//!
//! The larger vocabularies live as `key=value` resources; the small ones
//! are declared inline.

use seqsub_schema::CvList;

pub(crate) fn platforms() -> CvList {
    CvList::parse(include_str!("../resources/platform.txt"))
}

/// Instrument models; the value of each entry is the platform it implies.
pub(crate) fn instruments() -> CvList {
    CvList::parse(include_str!("../resources/instrument.txt"))
}

pub(crate) fn library_sources() -> CvList {
    CvList::parse(include_str!("../resources/library_source.txt"))
}

pub(crate) fn library_selections() -> CvList {
    CvList::parse(include_str!("../resources/library_selection.txt"))
}

pub(crate) fn library_strategies() -> CvList {
    CvList::parse(include_str!("../resources/library_strategy.txt"))
}

pub(crate) fn read_types() -> CvList {
    CvList::from_values([
        "single",
        "paired",
        "cell_barcode",
        "umi_barcode",
        "feature_barcode",
        "sample_barcode",
    ])
}

pub(crate) fn molecule_types() -> CvList {
    CvList::from_values(["genomic DNA", "genomic RNA", "viral cRNA"])
}

pub(crate) fn assembly_types() -> CvList {
    CvList::from_values([
        "clone or isolate",
        "primary metagenome",
        "binned metagenome",
        "Metagenome-Assembled Genome (MAG)",
        "Environmental Single-Cell Amplified Genome (SAG)",
    ])
}
