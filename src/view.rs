//! The link view: configuration, rows and state in, HTML fragment out.

use crate::config::{ContainerStyle, RenderConfig, ViewConfiguration};
use crate::error::{Error, Result};
use crate::flowchart::Flowchart;
use crate::html;
use crate::join::{join_rows, JoinSpec};
use crate::model::EdgeRecord;
use crate::rows::{edges_from_rows, RowMapping};
use crate::schema::{Catalog, FieldMeta, TableMeta};
use crate::sql::{Dialect, JoinQuery, SqlQuery};
use crate::state::read_state;
use serde_json::Value;
use std::collections::BTreeMap;

/// Render edge records to the HTML fragment, or the no-rows message.
pub fn render_edges(edges: &[EdgeRecord], config: &RenderConfig) -> String {
    match Flowchart::new(config).render(edges) {
        Some(text) => html::diagram_fragment(&text, &config.container),
        None => html::no_rows_message(config.source_table.as_deref()),
    }
}

/// Render rows that already carry the `sid`/`src`/`did`/`dst` aliases.
pub fn render_rows(rows: &[Value], config: &RenderConfig) -> Result<String> {
    render_with_mapping(rows, config, &RowMapping::with_label(config.label_field.clone()))
}

fn render_with_mapping(rows: &[Value], config: &RenderConfig, mapping: &RowMapping) -> Result<String> {
    let edges = edges_from_rows(rows, mapping).map_err(|e| {
        tracing::warn!(error = %e, "refusing to render link rows");
        Error::from(e)
    })?;
    Ok(render_edges(&edges, config))
}

/// Wrap a stored Mermaid string for display.
pub fn render_field_view(value: &str, style: &ContainerStyle) -> String {
    html::field_fragment(value, style)
}

/// A link view validated against its schema.
#[derive(Debug, Clone)]
pub struct LinkView {
    render: RenderConfig,
    join: JoinSpec,
    links: TableMeta,
}

impl LinkView {
    pub fn new(config: &ViewConfiguration, links: &TableMeta, catalog: &Catalog) -> Result<Self> {
        let render = config.render_config(Some(&links.name))?;
        let join = config.validate(links, catalog)?;
        Ok(Self {
            render,
            join,
            links: links.clone(),
        })
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }

    pub fn join_spec(&self) -> &JoinSpec {
        &self.join
    }

    /// State keys the view filters on: every links field, each optional.
    pub fn state_fields(&self) -> &[FieldMeta] {
        &self.links.fields
    }

    /// Render rows in the joined shape: endpoint aliases plus `lbl`.
    pub fn run_joined(&self, rows: &[Value]) -> Result<String> {
        render_with_mapping(rows, &self.render, &self.join.mapping())
    }

    /// Filter `links_rows` by `state`, join them to `node_rows` and render.
    pub fn run(
        &self,
        links_rows: &[Value],
        node_rows: &[Value],
        state: &BTreeMap<String, String>,
    ) -> Result<String> {
        let conditions = read_state(state, &self.links)?;
        let rows = join_rows(links_rows, node_rows, &self.join, &conditions)?;
        self.run_joined(&rows)
    }

    /// SQL for fetching the joined rows; the result rows feed [`LinkView::run_sql_rows`].
    pub fn query(&self, state: &BTreeMap<String, String>, dialect: Dialect) -> Result<SqlQuery> {
        let conditions = read_state(state, &self.links)?;
        Ok(JoinQuery::new(&self.join, dialect).build(&conditions)?)
    }

    /// Render rows returned by the statement from [`LinkView::query`].
    pub fn run_sql_rows(&self, query: &SqlQuery, rows: &[Value]) -> Result<String> {
        render_with_mapping(rows, &self.render, &query.mapping)
    }
}
