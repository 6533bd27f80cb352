use std::collections::BTreeMap;

/// How one resource type derives its name from the validated prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    /// `{prefix}-{suffix}`, the default.
    Suffix(&'static str),
    /// Bare `{prefix}`; the caller appends their own uniqueness token
    /// (account id, region) for globally-unique namespaces.
    Bare,
    /// `{before}{prefix}{after}` for log groups, secret and parameter paths.
    Path { before: &'static str, after: &'static str },
    /// `{prefix}-{suffix}.fifo`; SQS FIFO queues must end in `.fifo`.
    Fifo(&'static str),
}

impl NameRule {
    pub fn render(&self, prefix: &str) -> String {
        match self {
            NameRule::Suffix(s) => format!("{prefix}-{s}"),
            NameRule::Bare => prefix.to_string(),
            NameRule::Path { before, after } => format!("{before}{prefix}{after}"),
            NameRule::Fifo(s) => format!("{prefix}-{s}.fifo"),
        }
    }
}

const fn path(before: &'static str, after: &'static str) -> NameRule {
    NameRule::Path { before, after }
}

/// The resource name table. Keys are the stable identifiers Terraform
/// configurations index with; the order here groups by service category and
/// does not matter to consumers (output maps are sorted).
pub const RESOURCE_NAMES: &[(&str, NameRule)] = &[
    // compute
    ("ec2_instance",                NameRule::Suffix("ec2")),
    ("launch_template",             NameRule::Suffix("lt")),
    ("key_pair",                    NameRule::Suffix("key")),
    ("ami",                         NameRule::Suffix("ami")),
    ("lambda",                      NameRule::Suffix("lambda")),
    ("lambda_layer",                NameRule::Suffix("layer")),
    ("ecs_cluster",                 NameRule::Suffix("ecs-cluster")),
    ("ecs_service",                 NameRule::Suffix("ecs-service")),
    ("ecs_task_definition",         NameRule::Suffix("task")),
    // networking
    ("vpc",                         NameRule::Suffix("vpc")),
    ("subnet_public",               NameRule::Suffix("public")),
    ("subnet_private",              NameRule::Suffix("private")),
    ("subnet_database",             NameRule::Suffix("db")),
    ("internet_gateway",            NameRule::Suffix("igw")),
    ("nat_gateway",                 NameRule::Suffix("nat")),
    ("elastic_ip",                  NameRule::Suffix("eip")),
    ("route_table_public",          NameRule::Suffix("public-rt")),
    ("route_table_private",         NameRule::Suffix("private-rt")),
    ("route_table_database",        NameRule::Suffix("db-rt")),
    ("security_group_alb",          NameRule::Suffix("alb-sg")),
    ("security_group_app",          NameRule::Suffix("app-sg")),
    ("security_group_database",     NameRule::Suffix("db-sg")),
    ("security_group_cache",        NameRule::Suffix("cache-sg")),
    ("security_group_vpce",         NameRule::Suffix("vpce-sg")),
    ("nacl_public",                 NameRule::Suffix("public-nacl")),
    ("nacl_private",                NameRule::Suffix("private-nacl")),
    ("vpc_endpoint_s3",             NameRule::Suffix("s3-vpce")),
    ("vpc_endpoint_dynamodb",       NameRule::Suffix("ddb-vpce")),
    ("vpc_endpoint_interface",      NameRule::Suffix("vpce")),
    ("vpc_peering",                 NameRule::Suffix("peer")),
    ("vpc_flow_log_group",          path("/aws/vpc-flow-logs/", "")),
    ("alb",                         NameRule::Suffix("alb")),
    ("nlb",                         NameRule::Suffix("nlb")),
    ("alb_target_group",            NameRule::Suffix("alb-tg")),
    ("nlb_target_group",            NameRule::Suffix("nlb-tg")),
    // database / caching
    ("rds_instance",                NameRule::Suffix("rds")),
    ("rds_replica",                 NameRule::Suffix("rds-ro")),
    ("aurora_cluster",              NameRule::Suffix("aurora")),
    ("aurora_instance",             NameRule::Suffix("aurora-instance")),
    ("db_subnet_group",             NameRule::Suffix("db-subnet-group")),
    ("db_parameter_group",          NameRule::Suffix("db-params")),
    ("db_option_group",             NameRule::Suffix("db-options")),
    ("db_event_subscription",       NameRule::Suffix("db-events")),
    ("elasticache_cluster",         NameRule::Suffix("cache")),
    ("elasticache_replication_group", NameRule::Suffix("cache-rg")),
    ("elasticache_subnet_group",    NameRule::Suffix("cache-subnet-group")),
    ("elasticache_parameter_group", NameRule::Suffix("cache-params")),
    ("dms_replication_instance",    NameRule::Suffix("dms")),
    ("dms_replication_task",        NameRule::Suffix("dms-task")),
    ("dms_source_endpoint",         NameRule::Suffix("dms-src")),
    ("dms_target_endpoint",         NameRule::Suffix("dms-dst")),
    // storage
    ("s3_bucket",                   NameRule::Bare),
    ("ecr_repository",              NameRule::Bare),
    ("dynamodb_table",              NameRule::Suffix("table")),
    ("efs_file_system",             NameRule::Suffix("efs")),
    ("ebs_volume",                  NameRule::Suffix("ebs")),
    // messaging
    ("sqs_queue",                   NameRule::Suffix("queue")),
    ("sqs_queue_fifo",              NameRule::Fifo("queue")),
    ("sqs_dlq",                     NameRule::Suffix("dlq")),
    ("sqs_dlq_fifo",                NameRule::Fifo("dlq")),
    ("sns_topic",                   NameRule::Suffix("topic")),
    ("eventbridge_bus",             NameRule::Suffix("bus")),
    ("eventbridge_rule",            NameRule::Suffix("rule")),
    ("kinesis_stream",              NameRule::Suffix("stream")),
    ("kinesis_firehose",            NameRule::Suffix("firehose")),
    // IAM / security
    ("iam_role",                    NameRule::Suffix("role")),
    ("iam_policy",                  NameRule::Suffix("policy")),
    ("iam_instance_profile",        NameRule::Suffix("profile")),
    ("lambda_execution_role",       NameRule::Suffix("lambda-role")),
    ("ecs_task_role",               NameRule::Suffix("task-role")),
    ("ecs_execution_role",          NameRule::Suffix("exec-role")),
    ("cicd_role",                   NameRule::Suffix("cicd-role")),
    ("kms_key_alias",               path("alias/", "")),
    ("secret_db_credentials",       path("", "/db/credentials")),
    ("secret_api_keys",             path("", "/api/keys")),
    ("secret_app_config",           path("", "/app/config")),
    ("ssm_parameter_root",          path("/", "")),
    ("acm_certificate",             NameRule::Suffix("cert")),
    ("waf_web_acl",                 NameRule::Suffix("waf")),
    ("waf_ip_set",                  NameRule::Suffix("waf-ipset")),
    // DNS
    ("route53_health_check",        NameRule::Suffix("health")),
    ("route53_query_log_group",     path("/aws/route53/", "")),
    // API Gateway
    ("api_gateway",                 NameRule::Suffix("api")),
    ("api_gateway_authorizer",      NameRule::Suffix("authorizer")),
    ("api_gateway_usage_plan",      NameRule::Suffix("usage-plan")),
    ("api_gateway_api_key",         NameRule::Suffix("api-key")),
    ("api_gateway_log_group",       path("/aws/apigateway/", "")),
    ("websocket_api",               NameRule::Suffix("ws-api")),
    // CDN / WAF edge
    ("cloudfront_distribution",     NameRule::Suffix("cdn")),
    ("cloudfront_oac",              NameRule::Suffix("oac")),
    ("cloudfront_cache_policy",     NameRule::Suffix("cache-policy")),
    // observability
    ("lambda_log_group",            path("/aws/lambda/", "")),
    ("ecs_log_group",               path("/aws/ecs/", "")),
    ("app_log_group",               path("/app/", "")),
    ("cloudwatch_dashboard",        NameRule::Suffix("dashboard")),
    ("alarm_cpu_high",              NameRule::Suffix("cpu-high")),
    ("alarm_memory_high",           NameRule::Suffix("memory-high")),
    ("alarm_5xx",                   NameRule::Suffix("5xx")),
    ("alarm_latency",               NameRule::Suffix("latency")),
    ("alarm_dlq_depth",             NameRule::Suffix("dlq-depth")),
    ("xray_group",                  NameRule::Suffix("xray")),
    ("synthetics_canary",           NameRule::Suffix("canary")),
    // autoscaling
    ("autoscaling_group",           NameRule::Suffix("asg")),
    ("scale_out_policy",            NameRule::Suffix("scale-out")),
    ("scale_in_policy",             NameRule::Suffix("scale-in")),
    ("app_autoscaling_target",      NameRule::Suffix("scaling-target")),
    // backup
    ("backup_vault",                NameRule::Suffix("vault")),
    ("backup_plan",                 NameRule::Suffix("backup-plan")),
    ("backup_selection",            NameRule::Suffix("backup-selection")),
    ("dlm_policy",                  NameRule::Suffix("dlm")),
];

/// Availability-zone suffixes used to disambiguate per-AZ entries in the
/// Name-tag map.
pub const AZ_SUFFIXES: &[&str] = &["1a", "1b", "1c"];

/// Resource types whose AWS convention is a Name tag rather than a name
/// argument, keyed the same way as `RESOURCE_NAMES`.
const NAME_TAG_SINGLE: &[(&str, NameRule)] = &[
    ("vpc",                     NameRule::Suffix("vpc")),
    ("ec2_instance",            NameRule::Suffix("ec2")),
    ("internet_gateway",        NameRule::Suffix("igw")),
    ("elastic_ip",              NameRule::Suffix("eip")),
    ("route_table_public",      NameRule::Suffix("public-rt")),
    ("security_group_alb",      NameRule::Suffix("alb-sg")),
    ("security_group_app",      NameRule::Suffix("app-sg")),
    ("security_group_database", NameRule::Suffix("db-sg")),
    ("security_group_cache",    NameRule::Suffix("cache-sg")),
    ("security_group_vpce",     NameRule::Suffix("vpce-sg")),
    ("vpc_endpoint_s3",         NameRule::Suffix("s3-vpce")),
    ("vpc_endpoint_dynamodb",   NameRule::Suffix("ddb-vpce")),
    ("vpc_endpoint_interface",  NameRule::Suffix("vpce")),
    ("vpc_peering",             NameRule::Suffix("peer")),
];

/// Per-AZ Name-tag entries: `(key stem, suffix stem)` crossed with
/// `AZ_SUFFIXES`, e.g. `subnet_public_1a` -> `{prefix}-public-1a`.
const NAME_TAG_PER_AZ: &[(&str, &str)] = &[
    ("subnet_public",       "public"),
    ("subnet_private",      "private"),
    ("subnet_database",     "db"),
    ("route_table_private", "private-rt"),
    ("nat_gateway",         "nat"),
];

/// Render the full resource name table for a validated prefix.
pub fn name_map(prefix: &str) -> BTreeMap<String, String> {
    RESOURCE_NAMES
        .iter()
        .map(|(key, rule)| ((*key).to_string(), rule.render(prefix)))
        .collect()
}

/// Render the Name-tag subset, including the fixed per-AZ entries.
pub fn name_tag_map(prefix: &str) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = NAME_TAG_SINGLE
        .iter()
        .map(|(key, rule)| ((*key).to_string(), rule.render(prefix)))
        .collect();
    for (key, stem) in NAME_TAG_PER_AZ {
        for az in AZ_SUFFIXES {
            map.insert(format!("{key}_{az}"), format!("{prefix}-{stem}-{az}"));
        }
    }
    map
}
