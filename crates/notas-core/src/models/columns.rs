//! Report column names, shared by templates, records and the report.

pub const NUMERO_NF: &str = "NUMERO DA NF";
pub const MUNICIPIO_NF: &str = "MUNICIPIO DA NF";
pub const CODIGO_VERIFICACAO: &str = "CODIGO DE VERIFICAÇÃO";
pub const CNPJ_FORNECEDOR: &str = "CNPJ FORNECEDOR";
pub const SERIE_NF: &str = "SERIE NF";
pub const DATA_EMISSAO_NF: &str = "DATA DE EMISSAO NF";
pub const VALOR_BRUTO: &str = "VALOR BRUTO";
pub const TIPO_SERVICO: &str = "TIPO DE SERVIÇO";
pub const VALOR_RETENCAO: &str = "VALOR DA RETENÇÃO";
pub const STATUS_EXECUCAO: &str = "STATUS DA EXECUÇÃO";

/// Column order of the consolidated report.
pub const CANONICAL_COLUMNS: [&str; 10] = [
    NUMERO_NF,
    MUNICIPIO_NF,
    CODIGO_VERIFICACAO,
    CNPJ_FORNECEDOR,
    SERIE_NF,
    DATA_EMISSAO_NF,
    VALOR_BRUTO,
    TIPO_SERVICO,
    VALOR_RETENCAO,
    STATUS_EXECUCAO,
];
