use crate::app::View;

/// 应用命令枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // ===== 退出 =====
    Quit,

    // ===== 视图 =====
    /// 切换到指定视图
    SwitchView(View),
    /// 切换到下一个视图
    NextView,
    /// 显示快捷键帮助
    ShowHelp,

    // ===== 导航 =====
    /// 选择上一项
    SelectUp,
    /// 选择下一项
    SelectDown,
    /// 周视图：前一天
    DayLeft,
    /// 周视图：后一天
    DayRight,
    /// 上一周
    PrevWeek,
    /// 下一周
    NextWeek,
    /// 回到本周
    ThisWeek,

    // ===== 任务与目标 =====
    /// 切换任务完成状态
    ToggleTask,
    /// 创建新任务
    NewTask,
    /// 创建新目标
    NewGoal,
    /// 编辑选中项的标题
    EditSelected,
    /// 删除选中项
    DeleteSelected,
    /// 目标进度 +5
    ProgressUp,
    /// 目标进度 -5
    ProgressDown,
}
