//! Built-in layouts shipped with the binary.

use super::postprocess::PostProcess;
use super::rule::{AnchorRule, Coord, RegionOffset};
use super::template::Template;
use crate::models::columns::*;

/// Layout key of the Boa Vista NFS-e.
pub const BOA_VISTA: &str = "boa_vista";

/// All built-in templates.
pub fn builtin_templates() -> Vec<Template> {
    vec![boa_vista()]
}

/// NFS-e issued by the municipality of Boa Vista.
///
/// Offsets are tuned to that layout and do not transfer to other issuers.
pub fn boa_vista() -> Template {
    Template::new(BOA_VISTA)
        .with_description("NFS-e - Prefeitura Municipal de Boa Vista")
        .with_rule(
            AnchorRule::new(
                NUMERO_NF,
                "Número da Nota",
                RegionOffset::new(
                    Coord::left(0.0),
                    Coord::bottom(0.0),
                    Coord::right(60.0),
                    Coord::bottom(15.0),
                ),
            )
            .required(),
        )
        .with_rule(
            AnchorRule::new(
                CODIGO_VERIFICACAO,
                "Código de Verificação",
                RegionOffset::new(
                    Coord::left(0.0),
                    Coord::bottom(0.0),
                    Coord::right(150.0),
                    Coord::bottom(20.0),
                ),
            )
            .with_post(PostProcess::FirstToken),
        )
        .with_rule(
            AnchorRule::new(
                CNPJ_FORNECEDOR,
                "Prestador do(s) Serviço(s)",
                RegionOffset::new(
                    Coord::left(50.0),
                    Coord::bottom(-10.0),
                    Coord::right(130.0),
                    Coord::bottom(0.0),
                ),
            )
            .with_secondary(
                "CPF/CNPJ:",
                RegionOffset::new(
                    Coord::left(-150.0),
                    Coord::bottom(0.0),
                    Coord::right(100.0),
                    Coord::bottom(100.0),
                ),
            )
            .required(),
        )
        .with_rule(
            AnchorRule::new(
                DATA_EMISSAO_NF,
                "Data e Hora de Emissão",
                RegionOffset::new(
                    Coord::left(0.0),
                    Coord::bottom(0.0),
                    Coord::right(-12.0),
                    Coord::bottom(10.0),
                ),
            )
            .with_post(PostProcess::FirstToken)
            .required(),
        )
        .with_rule(
            AnchorRule::new(
                VALOR_BRUTO,
                "Valor do(s) Serviço(s)",
                RegionOffset::new(
                    Coord::right(-50.0),
                    Coord::top(8.0),
                    Coord::right(50.0),
                    Coord::bottom(10.0),
                ),
            )
            .required(),
        )
        .with_rule(
            AnchorRule::new(
                TIPO_SERVICO,
                "Classificação do Serviço",
                RegionOffset::new(
                    Coord::left(0.0),
                    Coord::bottom(0.0),
                    Coord::page_right(0.0),
                    Coord::bottom(40.0),
                ),
            )
            .with_post(PostProcess::JoinLines),
        )
        .with_rule(
            AnchorRule::new(
                VALOR_RETENCAO,
                "Retenções Federais",
                RegionOffset::new(
                    Coord::left(0.0),
                    Coord::bottom(0.0),
                    Coord::right(70.0),
                    Coord::bottom(10.0),
                ),
            )
            .with_secondary(
                "INSS",
                RegionOffset::new(
                    Coord::left(-150.0),
                    Coord::bottom(0.0),
                    Coord::right(150.0),
                    Coord::bottom(50.0),
                ),
            ),
        )
        .with_static(SERIE_NF, "1")
}
