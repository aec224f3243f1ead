//! Task: Database schema and seed rows.

use crate::bootstrap::types::BootContext;
use crate::db::init_schema;
use crate::errors::BootResult;
use crate::pipeline::PipelineTask;

pub struct SchemaTask;

impl PipelineTask<BootContext> for SchemaTask {
    fn run(&self, ctx: &mut BootContext) -> BootResult<()> {
        let report = init_schema(
            ctx.volume()?,
            &ctx.options.database_file,
            &ctx.options.locale,
        )?;
        ctx.schema = Some(report);
        Ok(())
    }

    fn name(&self) -> &str {
        "schema_init"
    }
}
