//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整次扫描的调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用生命周期
//! - 获取浏览器会话（启动无头 / 连接调试端口）
//! - 构建引擎与扫描器，输出全局统计
//!
//! ### `sweep` - 字母扫描器
//! - 按序遍历配置的字母区间，每个字母发起一次搜索
//! - 单个字母失败只跳过该字母，绝不中断整次扫描
//!
//! ### `pagination` - 分页循环
//! - 在当前字母的结果页之间推进，逐条委托给条目流程
//!
//! ## 层次关系
//!
//! ```text
//! app (一次运行)
//!     ↓
//! sweep (遍历字母)
//!     ↓
//! pagination (遍历结果页)
//!     ↓
//! workflow::ItemCycle (处理单个条目)
//!     ↓
//! services (能力层：extract / dispatch / sheets)
//!     ↓
//! infrastructure (基础设施：Engine)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：sweep 管字母，pagination 管页，ItemCycle 管条目
//! 2. **资源隔离**：只有编排层持有 Browser 和 Engine
//! 3. **计数外显**：各层按值返回计数，向上累加，无全局可变状态

pub mod app;
pub mod pagination;
pub mod sweep;

pub use app::App;
pub use sweep::Sweep;
