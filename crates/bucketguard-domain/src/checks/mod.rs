use crate::model::BucketModel;
use crate::policy::EffectiveConfig;
use bucketguard_types::Finding;

pub mod default_encryption;
pub mod public_access_block;
mod utils;


/// Run every enabled check against one bucket, appending findings in check order.
pub fn run_all(bucket: &BucketModel, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    public_access_block::run(bucket, cfg, out);
    default_encryption::run(bucket, cfg, out);
}
