//! Fixed OncoKB column schemas, well-known file names and tool names.
//!
//! Everything here is an immutable shared table. The annotation column
//! order is part of the on-disk cache format and must never change.

/// Environment variable naming a file that holds the OncoKB bearer token.
pub const TOKEN_PATH_VAR: &str = "ONCOKB_TOKEN";

/// External annotation scripts from the oncokb-annotator package.
pub const MAF_ANNOTATOR: &str = "MafAnnotator.py";
pub const CNA_ANNOTATOR: &str = "CnaAnnotator.py";
pub const FUSION_ANNOTATOR: &str = "FusionAnnotator.py";

/// Column the primary MAF annotation queries by. Biomarker MAFs lack
/// this column and are annotated without it.
pub const MAF_QUERY_KEY: &str = "Genomic_Change";

/// Annotated MAF output written to the scratch directory.
pub const ANNOTATED_MAF: &str = "annotated_maf.tsv";

/// Annotated CNA output stem; callers may prefix it with an extension.
pub const DATA_CNA_ANNOTATED: &str = "data_CNA_oncoKBgenes_nonDiploid_annotated.txt";

/// Annotated fusion output written to the report directory.
pub const DATA_FUSIONS_ANNOTATED: &str = "data_fusions_oncokb_annotated.txt";

/// Side-channel sample info file consumed by the annotation scripts.
pub const CLINICAL_INFO_FILE: &str = "oncokb_clinical_info.txt";

/// Cache file names, one set per OncoTree-code subdirectory.
pub const MAF_CACHE_FILE: &str = "maf_cache.json";
pub const CNA_CACHE_FILE: &str = "cna_cache.json";
pub const FUSION_CACHE_FILE: &str = "fusion_cache.json";

/// Annotation value for an alteration OncoKB knows nothing about.
pub const UNKNOWN: &str = "Unknown";

/// First annotation column; its position in an annotated header row
/// locates the annotation boundary.
pub const ANNOTATED_HEADER: &str = "ANNOTATED";

/// The 27 columns the external annotator appends to each row, in order.
pub const ANNOTATION_HEADERS: [&str; 27] = [
    "ANNOTATED",
    "GENE_IN_ONCOKB",
    "VARIANT_IN_ONCOKB",
    "MUTATION_EFFECT",
    "MUTATION_EFFECT_CITATIONS",
    "ONCOGENIC",
    "LEVEL_1",
    "LEVEL_2",
    "LEVEL_3A",
    "LEVEL_3B",
    "LEVEL_4",
    "LEVEL_R1",
    "LEVEL_R2",
    "HIGHEST_LEVEL",
    "HIGHEST_SENSITIVE_LEVEL",
    "HIGHEST_RESISTANCE_LEVEL",
    "TX_CITATIONS",
    "LEVEL_Dx1",
    "LEVEL_Dx2",
    "LEVEL_Dx3",
    "HIGHEST_DX_LEVEL",
    "DX_CITATIONS",
    "LEVEL_Px1",
    "LEVEL_Px2",
    "LEVEL_Px3",
    "HIGHEST_PX_LEVEL",
    "PX_CITATIONS",
];

/// Annotations appended when a MAF or fusion row has no cache entry:
/// annotated, not in OncoKB, unknown effect, every level column blank.
pub const DEFAULT_ANNOTATIONS: [&str; 27] = [
    "True", "False", "False", "Unknown", "", "Unknown", "", "", "", "", "", "", "", "", "", "",
    "", "", "", "", "", "", "", "", "", "", "",
];

/// Leading columns of an annotated CNA output, ahead of the annotation
/// columns proper.
pub const CNA_OUTPUT_PREFIX: [&str; 4] = ["SAMPLE_ID", "CANCER_TYPE", "HUGO_SYMBOL", "ALTERATION"];

/// Header written when a fusion input has no data rows; the external
/// tool is never invoked for such inputs, so this stands in for its
/// output schema.
pub const FUSION_EMPTY_HEADERS: [&str; 15] = [
    "Tumor_Sample_Barcode",
    "Fusion",
    "mutation_effect",
    "ONCOGENIC",
    "LEVEL_1",
    "LEVEL_2",
    "LEVEL_3A",
    "LEVEL_3B",
    "LEVEL_4",
    "LEVEL_R1",
    "LEVEL_R2",
    "LEVEL_R3",
    "HIGHEST_LEVEL",
    "HIGHEST_SENSITIVE_LEVEL",
    "HIGHEST_RESISTANCE_LEVEL",
];
